pub mod auth;
#[cfg(test)]
pub mod faulty_repo;
pub mod usecase;

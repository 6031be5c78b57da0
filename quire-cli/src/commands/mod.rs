pub mod hash_password;
pub mod permissions;
pub mod serve;

//! Cryptographic implementations: Argon2id credential hashing and HS256
//! bearer tokens.

pub mod password;
pub mod token;

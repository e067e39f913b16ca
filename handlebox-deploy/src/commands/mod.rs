pub mod deploy;
pub mod deposit;
pub mod export;
pub mod keygen;
pub mod show;

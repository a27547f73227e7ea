mod presence_port;
mod token_storage_port;

pub use presence_port::PresencePort;
pub use token_storage_port::TokenStoragePort;

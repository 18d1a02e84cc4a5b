//! Abstract trait interfaces for the message store.

mod incrementer;
mod lob;
mod store;

pub use incrementer::SurrogateKeyIncrementer;
pub use lob::{ByteaLobCodec, LobCodec};
pub use store::MessageStore;

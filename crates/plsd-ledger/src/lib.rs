//! plsd-ledger: the on-disk ledger behind the filekeeper
//!
//! ```text
//! Ledger
//!   ├── ShardStore   shards_file: MaxShards × 32-byte compressed G1 points
//!   ├── KeyStore     keys_file:   append-only 64-byte compressed G2 points
//!   └── BlockChain   <root_path><hex(i)>: 256-byte block records
//!                    <encrypt_path><hex(i)>.enc: one-time-pad ciphertexts
//! ```
//!
//! Block `i+1` binds the digest of block `i`, the digests of ciphertext and
//! plaintext `i`, and a pairing-derived control tag over shard `i mod M` and
//! encapsulated key `i`. Rotating the time-key rewrites both stores in place
//! and leaves every ciphertext and control tag valid.

pub mod chain;
pub mod encrypt;
pub mod key_store;
pub mod ledger;
pub mod shard_store;

pub use chain::{BlockChain, BlockRecord, BLOCK_LEN};
pub use encrypt::encrypt_file;
pub use key_store::KeyStore;
pub use ledger::Ledger;
pub use shard_store::ShardStore;

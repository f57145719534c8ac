pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod templates;

pub use error::BossError;
pub use router::{BossState, boss_router};
pub use templates::{TemplateCache, TemplateData};

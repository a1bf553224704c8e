pub mod browser;
pub mod config;
pub mod error;
pub mod fields;
pub mod generator;
pub mod page;
pub mod reference;
pub mod scripts;
pub mod session;

pub use browser::FormBrowser;
pub use config::{BrowserConfig, DataVariant, FillConfig};
pub use error::{Error, Result};
pub use fields::{FieldKey, FillStep};
pub use generator::{generate, Record};
pub use page::{ButtonChoice, FillOutcome, Page};
pub use reference::ReferenceData;
pub use session::{FillReport, Session};

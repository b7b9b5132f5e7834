pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod logo;
pub mod qr;
pub mod record;
pub mod session;
pub mod terminal;

pub use config::Config;
pub use document::{compose, ComposedPage, Degradation, Footer};
pub use error::{
    ActionError, ConfigError, EncodeError, ExportError, LogoError, RecordError, SessionError,
};
pub use logo::Logo;
pub use qr::{render_raster, render_vector, CodeStyle, Overlay, RasterCode, VectorCode};
pub use record::{
    build_payload, build_record, ContactForm, ContactRecord, EncodedPayload, Escaping, Field,
};
pub use session::{Delivery, DirectoryDelivery, ExportArtifact, Phase, Session};
pub use terminal::{fits_in_terminal, render_to_terminal};

#[cfg(feature = "decode")]
pub use qr::decode_raster;

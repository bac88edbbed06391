//! Built-in cell models.
//!
//! Phenomenological models (Aliev-Panfilov, Barkley, Mitchell-Schaeffer,
//! Fenton-Karma, Bueno-Orovio) use a dimensionless potential in `[0, 1]`
//! or slightly above. Ionic models (Luo-Rudy 1991, ten Tusscher-Panfilov
//! 2006) use millivolts and milliseconds.

mod aliev_panfilov;
mod barkley;
mod bueno_orovio;
mod fenton_karma;
mod luo_rudy91;
mod mitchell_schaeffer;
mod tp06;

pub use aliev_panfilov::AlievPanfilov;
pub use barkley::Barkley;
pub use bueno_orovio::BuenoOrovio;
pub use fenton_karma::FentonKarma;
pub use luo_rudy91::LuoRudy91;
pub use mitchell_schaeffer::MitchellSchaeffer;
pub use tp06::TenTusscherPanfilov;

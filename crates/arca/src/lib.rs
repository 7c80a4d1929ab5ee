//! SOAP client for the fiscal authority (ARCA, ex AFIP).
//!
//! Two services: WSAA issues (Token, Sign) credentials from a CMS-signed
//! login ticket; WSFEv1 authorizes electronic invoices (CAE). Both are
//! plain SOAP over HTTPS with homologation and production endpoints.

pub mod client;
pub mod cms;
pub mod error;
pub mod wsaa;
pub mod wsfe;
pub mod xml;

pub use client::ArcaClient;
pub use error::{ArcaError, EventoArca};
pub use wsfe::RespuestaCae;

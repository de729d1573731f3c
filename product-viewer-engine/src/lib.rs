//! Interactive 3D viewer for the Oficina da Fampa textile products.
//!
//! Renders one product at a time (napkin, table base or tablecloth) as a
//! draped, textured surface with orbit controls, auto-rotation and
//! click-to-measure. On the web the host page drives it over JSON-RPC; native
//! builds carry their own control panel.

pub mod engine;
pub mod rpc;
pub mod tools;

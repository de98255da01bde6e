/*
 * Dudes and Trees - Module Definitions
 *
 * A capture-the-box game over procedural terrain. Good and bad guys race for
 * boxes the player places with the mouse; trees block them and water spoils
 * a placement. The simulation and click handling are plain library code; the
 * nannou window shell sits in app, input, renderer and ui.
 */

// Re-export key components for easier access
pub use app::Model;
pub use camera::Camera;
pub use click::{ClickOutcome, InertReason, Placement};
pub use debug::DebugInfo;
pub use entity::{Entity, EntityKind};
pub use error::ConfigError;
pub use params::GameParams;
pub use picking::{Pick, PickColor, PickPass};
pub use simulation::{Capture, TickReport};
pub use terrain::Terrain;
pub use world::{Stats, World};

// Define modules
pub mod app;
pub mod camera;
pub mod click;
pub mod debug;
pub mod entity;
pub mod error;
pub mod input;
pub mod logging;
pub mod params;
pub mod picking;
pub mod renderer;
pub mod simulation;
pub mod terrain;
pub mod ui;
pub mod world;

// Constants
pub const ENTITY_SIZE: f32 = 0.025;

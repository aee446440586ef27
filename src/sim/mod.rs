//! Game simulations and the shared aim/collision engine
//!
//! Both games consume the same beam primitive but own independent entity
//! lists and state machines; neither reaches into the other.

pub mod beam;
pub mod shooter;
pub mod volley;

pub use beam::{compute_aim_ray, ray_hits_circle, ray_hits_rect, AimRay, DwellSelector, Rect, UiTarget};
pub use shooter::{Enemy, ShooterGame};
pub use volley::{Projectile, VolleyGame};

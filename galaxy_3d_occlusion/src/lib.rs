/*!
# Galaxy 3D Occlusion

Hierarchical occlusion culling for the Galaxy 3D rendering engine.

Once per frame, the scene layer feeds every candidate object into an
[`OcclusionCullingBin`](culling::OcclusionCullingBin). The bin rebuilds an
octree over the objects' world-space bounding spheres, then walks it
front-to-back, testing each octree cell against the depth buffer with
asynchronous GPU occlusion queries. Objects drawn in the previous frame are
replayed first so that their depth already occludes what lies behind them.

## Architecture

- **CullBin**: Per-frame culling strategy driven by the scene layer
- **OcclusionCullingBin**: Octree + occlusion query + temporal coherence bin
- **VisibilityCache**: Objects drawn last frame, shared across bin generations
- **GraphicsDevice**: Backend trait for draw submission and occlusion queries
- **OcclusionQuery**: Handle to an in-flight query
- **Camera**: View transform and lens (near plane) used for ordering

Backends provide concrete types that implement the device and query traits.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod camera;
pub mod graphics_device;
pub mod scene;
pub mod culling;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging hub
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        // Note: engine_* macros are NOT re-exported here - they are internal only
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // GPU abstraction sub-module
    pub mod render {
        pub use crate::graphics_device::*;
    }

    // Cullable objects
    pub mod scene {
        pub use crate::scene::*;
    }

    // Culling bins
    pub mod culling {
        pub use crate::culling::*;
    }
}

// Re-export math library at crate root
pub use glam;

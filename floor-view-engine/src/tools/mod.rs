//! Pointer interaction with placed scene objects.
//!
//! A left press followed by a release within the drag threshold is a click.
//! Clicks cast a ray from the viewer camera through the cursor and select the
//! nearest box hit; dragging is left to the camera controls.
//!
//! ```text
//! press ─> PointerGesture::start
//! release ─> is_click? ─┬─ no ─> ignored (drag)
//!                       └─ yes ─> deselect previous
//!                                 ├─> pick_nearest (OBB slab test)
//!                                 └─> select hit, notify host
//! ```

/// Ray versus oriented bounding box intersection.
pub mod ray;

/// Click detection, picking and selection highlighting.
pub mod selection;

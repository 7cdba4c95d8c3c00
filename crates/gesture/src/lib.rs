// crates/gesture/src/lib.rs
//! Swipe gesture handling for list rows
//!
//! A pure state machine over pointer events, free of any UI toolkit. The host
//! feeds `Down`/`Move`/`Up`/`Cancel` events in, reads the visual offset back
//! out, and acts on the returned [`SwipeOutcome`].

pub mod swipe;

pub use swipe::{
    ActionBindings, PointerEvent, SwipeConfig, SwipeDirection, SwipeOutcome, SwipeRow,
};

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod card;
pub mod editor;
pub mod form;
pub mod forms;
pub mod ids;
pub mod model;
pub mod payload;
pub mod state;

pub use card::*;
pub use editor::*;
pub use form::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use payload::*;
pub use state::*;

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod dates;
pub mod error;
pub mod forms;
pub mod ids;
pub mod model;
pub mod notify;
pub mod state;
pub mod store;
pub mod table;
pub mod text;

pub use error::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use notify::*;
pub use state::*;
pub use store::*;
pub use table::*;
pub use text::*;

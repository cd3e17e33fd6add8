pub mod app;
pub mod catalog;
pub mod composer;
pub mod dispatch;
pub mod feed;
pub mod map;
pub mod model;
pub mod shared;

pub mod prelude {
    pub use crate::app::{App, View};
    pub use crate::catalog::{HttpCatalog, StopCatalog};
    pub use crate::composer::{
        ComposerView, Mode, Notice, RouteComposer, RouteDraft, SequenceRow, ValidationError,
    };
    pub use crate::dispatch::{Element, EventKind, EventTable, Router, Selector};
    pub use crate::map::{MapSurface, StopLayer};
    pub use crate::model::{AddRouteRequest, Direction, RouteStop, RouteSummary, Stop, StopId};
    pub use crate::shared::geo::{Bounds, Coordinate, Distance};
}

//! Engine errors

use sheen_core::{StructuralError, TreeError, WidgetId};
use thiserror::Error;

use crate::store::Scope;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("unknown widget {0:?}")]
    UnknownWidget(WidgetId),

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error("cannot move {child:?} under {parent:?}: it would become its own ancestor")]
    ReparentCycle { child: WidgetId, parent: WidgetId },

    #[error("no such scope: {0}")]
    UnknownScope(Scope),
}

impl From<TreeError> for StyleError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::UnknownWidget(id) => StyleError::UnknownWidget(id),
            TreeError::Cycle { child, parent } => StyleError::ReparentCycle { child, parent },
            TreeError::Structural(err) => StyleError::Structural(err),
        }
    }
}

pub type Result<T, E = StyleError> = std::result::Result<T, E>;

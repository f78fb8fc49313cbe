//! Executors: the mutations behind each category and action.
//!
//! Every filesystem change goes through [`FileOps`], so simulation mode
//! only logs. Registry and database changes check the flag themselves.

mod configs;
mod database;
mod games;
mod playlists;
mod tables;

use retrobox_core::{Category, Component};
use retrobox_lib::{FileOps, RunContext};

use crate::services::Services;
use crate::source::Item;
use crate::EngineError;

pub struct Executor<'a> {
    ctx: &'a RunContext,
    services: Services<'a>,
    files: FileOps,
    components: &'a [Component],
}

impl<'a> Executor<'a> {
    pub fn new(ctx: &'a RunContext, services: Services<'a>, components: &'a [Component]) -> Self {
        Self {
            ctx,
            services,
            files: ctx.files(),
            components,
        }
    }

    pub fn execute(&self, item: &Item) -> Result<(), EngineError> {
        log::info!(
            "{} {} '{}'",
            self.ctx.selection.action,
            self.ctx.selection.category,
            item.name()
        );
        match self.ctx.selection.category {
            Category::Tables => self.execute_table(item),
            Category::Playlists => self.execute_playlist(item),
            Category::PinupDatabase => self.execute_database_table(item),
            Category::Configs => self.execute_config(item),
            Category::Games => self.execute_game(item),
        }
    }

    /// True when the component takes part in this run.
    fn wants(&self, component: Component) -> bool {
        self.components.is_empty() || self.components.contains(&component)
    }

    fn unsupported(&self) -> EngineError {
        EngineError::Unsupported {
            category: self.ctx.selection.category,
            action: self.ctx.selection.action,
        }
    }
}

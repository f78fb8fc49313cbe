use retrobox_core::{Action, Component, Status};
use retrobox_db::{count_rows, table_exists};

use super::Verifier;
use crate::rows::Row;
use crate::source::Item;
use crate::EngineError;

impl Verifier<'_> {
    /// A PinUP database table is installed when it exists and holds rows,
    /// and exported when its dump is archived.
    pub(super) fn verify_database_table(
        &self,
        item: &Item,
        row: &mut Row,
    ) -> Result<(), EngineError> {
        let conn = self.services.database()?;
        let table = item.id();
        let filled = table_exists(conn, table)? && count_rows(conn, table)? > 0;
        let status = match self.ctx.selection.action {
            Action::Install => Status::from(filled),
            Action::Uninstall => Status::from(!filled),
            Action::Export => Status::from(self.ctx.database_archive(table).is_file()),
            _ => Status::NotApplicable,
        };
        if status.is_absent() {
            log::warn!(
                "PinUP table {} does not match the {} action",
                table,
                self.ctx.selection.action
            );
        }
        row.set(Component::PinupDatabase, status);
        Ok(())
    }
}

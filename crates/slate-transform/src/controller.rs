//! Transform lifecycle controller
//!
//! A resize gesture runs start → live (any number) → end. During the live
//! phase the visual node's scale drifts freely and the table model is left
//! alone. At the end the scale is folded into concrete track sizes, the node
//! is reset to scale 1, and the new table is handed to the store.

use slate_core::{
    plan_transform_commit, ResetAttrs, Result, ScaleResizeOptions, Table, TableConfig,
    TableStore, UpdateOptions,
};
use tracing::{debug, trace, warn};

use crate::{
    with_position_preservation, ConstraintInstaller, ModifierState, NodeAttrs, TableBoundBox,
    TransformableNode,
};

/// Collaborators notified when a gesture is committed
pub struct TransformContext<'a> {
    /// Receives the committed table
    pub store: &'a mut dyn TableStore,

    /// Receives the constraint rebuilt from the committed table
    pub constraints: &'a mut dyn ConstraintInstaller,
}

impl<'a> TransformContext<'a> {
    pub fn new(
        store: &'a mut dyn TableStore,
        constraints: &'a mut dyn ConstraintInstaller,
    ) -> Self {
        Self { store, constraints }
    }
}

/// The outcome of a committed gesture
#[derive(Debug, Clone, PartialEq)]
pub struct TransformCommit {
    /// The table after the resize
    pub table: Table,

    /// The attributes that were applied to the node
    pub reset: ResetAttrs,
}

/// Drives the resize lifecycle of one table and its visual node
pub struct TableTransformController<N> {
    table: Table,
    config: TableConfig,
    node: Option<N>,
    in_progress: bool,
    bound_box: TableBoundBox,
}

impl<N: TransformableNode> TableTransformController<N> {
    /// Create an idle controller for `table` with no node attached
    pub fn new(table: Table, config: TableConfig) -> Self {
        let bound_box = TableBoundBox::for_table(&table, &config);
        Self {
            table,
            config,
            node: None,
            in_progress: false,
            bound_box,
        }
    }

    /// Attach the visual node and install the initial constraint
    pub fn attach(&mut self, node: N, constraints: &mut dyn ConstraintInstaller) {
        self.node = Some(node);
        constraints.install_bound_box(self.bound_box);
        debug!("Attached node to table {}", self.table.id);
    }

    /// Detach and return the visual node
    pub fn detach(&mut self) -> Option<N> {
        let node = self.node.take();
        if node.is_some() {
            debug!("Detached node from table {}", self.table.id);
        }
        node
    }

    /// Replace the table after an external change (structural edit, undo)
    pub fn set_table(&mut self, table: Table, constraints: &mut dyn ConstraintInstaller) {
        self.table = table;
        self.reinstall_constraint(constraints);
    }

    /// Gesture started
    pub fn on_transform_start(&mut self) {
        if self.in_progress {
            trace!("Transform restarted on table {}", self.table.id);
        }
        self.in_progress = true;
    }

    /// Live frame of a gesture
    ///
    /// With the aspect lock held the node's scale is made uniform. Only the
    /// node is touched; the table is recomputed once, at the end.
    pub fn on_transform(&mut self, modifiers: ModifierState) {
        if !self.in_progress {
            return;
        }
        let Some(node) = self.node.as_mut() else {
            return;
        };

        if modifiers.keep_aspect_ratio() {
            let scale = node.scale();
            let uniform = scale.uniform();
            if uniform != scale {
                node.set_attrs(NodeAttrs::scale(uniform));
            }
        }
    }

    /// Gesture ended
    ///
    /// The reset attributes are applied to the node before anything else, so
    /// the next gesture never compounds on this one's scale. Returns `None`
    /// when no gesture was in progress or no node is attached.
    pub fn on_transform_end(
        &mut self,
        modifiers: ModifierState,
        ctx: TransformContext<'_>,
    ) -> Result<Option<TransformCommit>> {
        if !self.in_progress {
            return Ok(None);
        }
        self.in_progress = false;

        let Some(node) = self.node.as_mut() else {
            debug!("Transform ended on table {} with no node attached", self.table.id);
            return Ok(None);
        };

        let final_scale = node.scale();
        let options = ScaleResizeOptions::from_config(&self.config)
            .with_aspect_ratio(modifiers.keep_aspect_ratio());
        let (table, reset) = plan_transform_commit(
            &self.table,
            final_scale,
            node.position(),
            &options,
            &self.config,
        );

        node.set_attrs(reset.into());

        debug!(
            "Committed resize of table {} by {:?}: {}x{} -> {}x{}",
            table.id, final_scale, self.table.width, self.table.height, table.width, table.height
        );

        self.table = table;
        let stored = ctx
            .store
            .update_element(self.table.id, &self.table, UpdateOptions::commit());
        if let Err(ref e) = stored {
            warn!("Store rejected resize of table {}: {}", self.table.id, e);
        }
        self.reinstall_constraint(ctx.constraints);
        stored?;

        Ok(Some(TransformCommit {
            table: self.table.clone(),
            reset,
        }))
    }

    /// Apply a structural edit triggered from a menu and commit it
    ///
    /// The node is resized to the edited table while its position is
    /// preserved. Edits that leave the table unchanged (removing the last
    /// row, for example) are not sent to the store.
    pub fn apply_edit<F>(&mut self, edit: F, ctx: TransformContext<'_>) -> Result<Table>
    where
        F: FnOnce(&Table, &TableConfig) -> Table,
    {
        let edited = edit(&self.table, &self.config);
        if edited == self.table {
            trace!("Edit left table {} unchanged", self.table.id);
            return Ok(edited);
        }

        let store = ctx.store;
        let stored = match self.node.as_mut() {
            Some(node) => with_position_preservation(node, self.config.position_tolerance, |node| {
                node.set_attrs(NodeAttrs {
                    width: Some(edited.width),
                    height: Some(edited.height),
                    ..NodeAttrs::default()
                });
                store.update_element(edited.id, &edited, UpdateOptions::commit())
            }),
            None => store.update_element(edited.id, &edited, UpdateOptions::commit()),
        };

        self.table = edited;
        self.reinstall_constraint(ctx.constraints);
        stored?;

        debug!(
            "Applied edit to table {}: {}x{} cells",
            self.table.id, self.table.rows, self.table.cols
        );
        Ok(self.table.clone())
    }

    /// Delete the table from the store and detach its node
    pub fn delete(&mut self, store: &mut dyn TableStore) -> Result<Option<N>> {
        store.delete_element(self.table.id, UpdateOptions::commit())?;
        self.in_progress = false;
        debug!("Deleted table {}", self.table.id);
        Ok(self.node.take())
    }

    /// Whether a gesture is in progress
    pub fn is_transforming(&self) -> bool {
        self.in_progress
    }

    /// The controller's current table
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The constraint built from the current table
    pub fn bound_box(&self) -> TableBoundBox {
        self.bound_box
    }

    pub fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    pub fn node_mut(&mut self) -> Option<&mut N> {
        self.node.as_mut()
    }

    fn reinstall_constraint(&mut self, constraints: &mut dyn ConstraintInstaller) {
        self.bound_box = TableBoundBox::for_table(&self.table, &self.config);
        constraints.install_bound_box(self.bound_box);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockNode, RecordingInstaller, RecordingStore};
    use slate_core::{add_column, add_row, remove_row, Scale};

    fn table_200x100() -> Table {
        let config = TableConfig::default();
        let mut table = Table::new(2, 2, &config).with_position(10.0, 20.0);
        table.row_heights = vec![50.0, 50.0];
        table.recompute_size();
        table
    }

    fn attached() -> (TableTransformController<MockNode>, RecordingInstaller) {
        let table = table_200x100();
        let mut controller = TableTransformController::new(table.clone(), TableConfig::default());
        let mut installer = RecordingInstaller::default();
        controller.attach(MockNode::for_table(&table), &mut installer);
        (controller, installer)
    }

    #[test]
    fn test_end_resets_scale_and_commits() {
        let (mut controller, mut installer) = attached();
        let mut store = RecordingStore::default();

        controller.on_transform_start();
        controller.node_mut().unwrap().scale_x = 2.0;
        controller.on_transform(ModifierState::NONE);

        let commit = controller
            .on_transform_end(
                ModifierState::NONE,
                TransformContext::new(&mut store, &mut installer),
            )
            .unwrap()
            .unwrap();

        assert_eq!(commit.reset.scale_x, 1.0);
        assert_eq!(commit.reset.scale_y, 1.0);
        assert_eq!(commit.reset.width, 400.0);
        assert_eq!(commit.reset.height, 100.0);
        assert_eq!(controller.table().col_widths, vec![200.0, 200.0]);

        let node = controller.node().unwrap();
        assert_eq!(node.scale(), Scale::IDENTITY);
        assert_eq!(node.width, 400.0);
        assert!(!controller.is_transforming());
    }

    #[test]
    fn test_store_sees_reset_node() {
        let (mut controller, mut installer) = attached();
        let mut store = RecordingStore::default();

        controller.on_transform_start();
        controller.node_mut().unwrap().scale_y = 3.0;
        controller
            .on_transform_end(
                ModifierState::NONE,
                TransformContext::new(&mut store, &mut installer),
            )
            .unwrap();

        assert_eq!(store.updates.len(), 1);
        let (id, table, options) = &store.updates[0];
        assert_eq!(*id, controller.table().id);
        assert_eq!(table.height, 300.0);
        assert!(options.push_history);
        // the node had already been reset when the store was notified
        assert_eq!(controller.node().unwrap().set_attrs_calls, 1);
    }

    #[test]
    fn test_end_reinstalls_constraint_from_new_table() {
        let (mut controller, mut installer) = attached();
        let mut store = RecordingStore::default();
        assert_eq!(installer.installed.len(), 1);

        controller.on_transform_start();
        controller.node_mut().unwrap().scale_x = 0.5;
        controller
            .on_transform_end(
                ModifierState::NONE,
                TransformContext::new(&mut store, &mut installer),
            )
            .unwrap();

        assert_eq!(installer.installed.len(), 2);
        let latest = installer.installed.last().unwrap();
        assert_eq!(latest.aspect_ratio, 100.0 / 100.0);
        assert_eq!(*latest, controller.bound_box());
    }

    #[test]
    fn test_repeated_gestures_do_not_compound() {
        let (mut controller, mut installer) = attached();
        let mut store = RecordingStore::default();

        for _ in 0..2 {
            controller.on_transform_start();
            let node = controller.node_mut().unwrap();
            node.scale_x *= 2.0;
            controller
                .on_transform_end(
                    ModifierState::NONE,
                    TransformContext::new(&mut store, &mut installer),
                )
                .unwrap();
        }

        assert_eq!(controller.table().width, 800.0);
        assert_eq!(controller.node().unwrap().width, 800.0);
    }

    #[test]
    fn test_live_aspect_lock_touches_node_only() {
        let (mut controller, _installer) = attached();
        let before = controller.table().clone();

        controller.on_transform_start();
        {
            let node = controller.node_mut().unwrap();
            node.scale_x = 2.0;
            node.scale_y = 1.5;
        }
        controller.on_transform(ModifierState::shift());

        assert_eq!(controller.node().unwrap().scale(), Scale::new(1.5, 1.5));
        assert_eq!(*controller.table(), before);
    }

    #[test]
    fn test_live_without_start_is_ignored() {
        let (mut controller, _installer) = attached();
        controller.node_mut().unwrap().scale_x = 2.0;
        controller.on_transform(ModifierState::shift());
        assert_eq!(controller.node().unwrap().scale_x, 2.0);
    }

    #[test]
    fn test_end_without_start_is_ignored() {
        let (mut controller, mut installer) = attached();
        let mut store = RecordingStore::default();
        let result = controller
            .on_transform_end(
                ModifierState::NONE,
                TransformContext::new(&mut store, &mut installer),
            )
            .unwrap();
        assert!(result.is_none());
        assert!(store.updates.is_empty());
    }

    #[test]
    fn test_end_without_node_clears_progress() {
        let table = table_200x100();
        let mut controller: TableTransformController<MockNode> =
            TableTransformController::new(table.clone(), TableConfig::default());
        let mut store = RecordingStore::default();
        let mut installer = RecordingInstaller::default();

        controller.on_transform_start();
        let result = controller
            .on_transform_end(
                ModifierState::NONE,
                TransformContext::new(&mut store, &mut installer),
            )
            .unwrap();

        assert!(result.is_none());
        assert!(!controller.is_transforming());
        assert_eq!(*controller.table(), table);
        assert!(store.updates.is_empty());
    }

    #[test]
    fn test_store_error_still_reinstalls() {
        let (mut controller, mut installer) = attached();
        let mut store = RecordingStore::failing();

        controller.on_transform_start();
        controller.node_mut().unwrap().scale_x = 2.0;
        let result = controller.on_transform_end(
            ModifierState::NONE,
            TransformContext::new(&mut store, &mut installer),
        );

        assert!(result.is_err());
        assert_eq!(installer.installed.len(), 2);
        assert_eq!(controller.node().unwrap().scale_x, 1.0);
    }

    #[test]
    fn test_set_table_updates_constraint() {
        let (mut controller, mut installer) = attached();
        let wider = add_column(controller.table(), None, controller.config());
        controller.set_table(wider, &mut installer);
        assert_eq!(controller.bound_box().min_width, 120.0);
        assert_eq!(installer.installed.last().unwrap().min_width, 120.0);
    }

    #[test]
    fn test_apply_edit_commits_and_resizes_node() {
        let (mut controller, mut installer) = attached();
        let mut store = RecordingStore::default();

        let table = controller
            .apply_edit(
                |table, config| add_row(table, None, config),
                TransformContext::new(&mut store, &mut installer),
            )
            .unwrap();

        assert_eq!(table.rows, 3);
        assert_eq!(store.updates.len(), 1);
        assert!(store.updates[0].2.push_history);

        let node = controller.node().unwrap();
        assert_eq!(node.height, table.height);
        assert_eq!(node.position(), slate_core::Position::new(10.0, 20.0));
        assert_eq!(installer.installed.last().unwrap().min_height, 90.0);
    }

    #[test]
    fn test_noop_edit_is_not_stored() {
        let config = TableConfig::default();
        let table = Table::new(1, 2, &config);
        let mut controller = TableTransformController::new(table.clone(), config);
        let mut installer = RecordingInstaller::default();
        controller.attach(MockNode::for_table(&table), &mut installer);
        let mut store = RecordingStore::default();

        let result = controller
            .apply_edit(
                |table, _| remove_row(table, 0),
                TransformContext::new(&mut store, &mut installer),
            )
            .unwrap();

        assert_eq!(result, table);
        assert!(store.updates.is_empty());
    }

    #[test]
    fn test_delete_detaches_node() {
        let (mut controller, _installer) = attached();
        let mut store = RecordingStore::default();
        let node = controller.delete(&mut store).unwrap();

        assert!(node.is_some());
        assert!(controller.node().is_none());
        assert_eq!(store.deletes.len(), 1);
        assert!(store.deletes[0].1.push_history);
    }
}

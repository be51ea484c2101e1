//! Test doubles for the host collaborators

use slate_core::{CoreError, ElementId, Result, Table, TableStore, UpdateOptions};

use crate::{
    ConstraintInstaller, NodeAttrs, RestoreCheck, RestoreScheduler, TableBoundBox,
    TransformableNode,
};

#[derive(Debug, Clone, PartialEq)]
pub struct MockNode {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub set_attrs_calls: usize,
    pub redraws: usize,
}

impl MockNode {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            width: 100.0,
            height: 40.0,
            scale_x: 1.0,
            scale_y: 1.0,
            set_attrs_calls: 0,
            redraws: 0,
        }
    }

    pub fn for_table(table: &Table) -> Self {
        Self {
            width: table.width,
            height: table.height,
            ..Self::at(table.x, table.y)
        }
    }
}

impl TransformableNode for MockNode {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn scale_x(&self) -> f64 {
        self.scale_x
    }

    fn scale_y(&self) -> f64 {
        self.scale_y
    }

    fn set_attrs(&mut self, attrs: NodeAttrs) {
        self.set_attrs_calls += 1;
        if let Some(x) = attrs.x {
            self.x = x;
        }
        if let Some(y) = attrs.y {
            self.y = y;
        }
        if let Some(width) = attrs.width {
            self.width = width;
        }
        if let Some(height) = attrs.height {
            self.height = height;
        }
        if let Some(scale_x) = attrs.scale_x {
            self.scale_x = scale_x;
        }
        if let Some(scale_y) = attrs.scale_y {
            self.scale_y = scale_y;
        }
    }

    fn batch_draw(&mut self) {
        self.redraws += 1;
    }
}

#[derive(Default)]
pub struct RecordingStore {
    pub updates: Vec<(ElementId, Table, UpdateOptions)>,
    pub deletes: Vec<(ElementId, UpdateOptions)>,
    fail: bool,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl TableStore for RecordingStore {
    fn update_element(
        &mut self,
        id: ElementId,
        table: &Table,
        options: UpdateOptions,
    ) -> Result<()> {
        if self.fail {
            return Err(CoreError::Store("rejected".to_string()));
        }
        self.updates.push((id, table.clone(), options));
        Ok(())
    }

    fn delete_element(&mut self, id: ElementId, options: UpdateOptions) -> Result<()> {
        if self.fail {
            return Err(CoreError::Store("rejected".to_string()));
        }
        self.deletes.push((id, options));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingInstaller {
    pub installed: Vec<TableBoundBox>,
}

impl ConstraintInstaller for RecordingInstaller {
    fn install_bound_box(&mut self, constraint: TableBoundBox) {
        self.installed.push(constraint);
    }
}

#[derive(Default)]
pub struct RecordingScheduler {
    pub scheduled: Vec<RestoreCheck>,
}

impl RestoreScheduler for RecordingScheduler {
    fn schedule(&mut self, check: RestoreCheck) {
        self.scheduled.push(check);
    }
}

//! Inline executor, running tasks directly on the scheduling thread.

use crate::executor::{Executor, Task};

/// Executor that runs every task before `execute` returns
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor {}

impl InlineExecutor {
    pub fn new() -> Self {
        InlineExecutor {}
    }
}

impl Executor for InlineExecutor {
    fn execute(&self, task: Task) {
        task()
    }
}

/// Something the user asked the list to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    InputChanged(String),
    AddClicked,
    DeleteClicked(usize),
    MoveUpClicked(usize),
    MoveDownClicked(usize),
}

/// Ordered tasks plus the text typed but not yet added.
///
/// Every operation is total: blank input and out of range indices are
/// ignored and reported as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<String>,
    pending_input: String,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// Appends the pending input as typed. Trimming only decides whether it is blank.
    pub fn add_task(&mut self) -> bool {
        if self.pending_input.trim().is_empty() {
            log::trace!("ignoring blank task");
            return false;
        }
        let task = std::mem::take(&mut self.pending_input);
        log::debug!("adding task {:?} at {}", task, self.tasks.len());
        self.tasks.push(task);
        true
    }

    pub fn delete_task(&mut self, index: usize) -> bool {
        if index >= self.tasks.len() {
            log::trace!("ignoring delete of {index}, list has {}", self.tasks.len());
            return false;
        }
        let task = self.tasks.remove(index);
        log::debug!("deleted task {:?} from {}", task, index);
        true
    }

    pub fn move_task_up(&mut self, index: usize) -> bool {
        if index == 0 {
            return false;
        }
        self.swap(index - 1, index)
    }

    pub fn move_task_down(&mut self, index: usize) -> bool {
        self.swap(index, index.saturating_add(1))
    }

    fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= self.tasks.len() || b >= self.tasks.len() {
            log::trace!("ignoring swap of {a} and {b}, list has {}", self.tasks.len());
            return false;
        }
        self.tasks.swap(a, b);
        log::debug!("swapped tasks {a} and {b}");
        true
    }

    /// Dispatches an intent to the matching operation.
    pub fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::InputChanged(text) => {
                self.set_pending_input(text);
                true
            }
            Intent::AddClicked => self.add_task(),
            Intent::DeleteClicked(index) => self.delete_task(index),
            Intent::MoveUpClicked(index) => self.move_task_up(index),
            Intent::MoveDownClicked(index) => self.move_task_down(index),
        }
    }

    /// Consumes this snapshot and returns the one after `intent`.
    pub fn reduce(mut self, intent: Intent) -> Self {
        self.apply(intent);
        self
    }
}

//! File lifecycle: CLOSED -> OPEN -> CLOSED, CLOSED -> DELETED

use tracing::{debug, instrument};

use crate::domain::{FileState, NodeEntry, NodeError, NodeId, NodeKind, NodeResult, NodeTree};

impl NodeTree {
    pub fn file_state(&self, file: NodeId) -> NodeResult<FileState> {
        match self.entry(file)?.kind {
            NodeKind::File { state } => Ok(state),
            _ => Err(not_a_file(file)),
        }
    }

    /// Open a closed file.
    #[instrument(level = "trace", skip(self))]
    pub fn open(&mut self, file: NodeId) -> NodeResult<()> {
        let state = self.state_mut(file)?;
        check_not_deleted(*state, "open")?;
        check_state(*state, FileState::Closed, "file has to be closed before opening")?;
        *state = FileState::Open;
        debug!(%file, "file opened");
        Ok(())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn close(&mut self, file: NodeId) -> NodeResult<()> {
        let state = self.state_mut(file)?;
        check_state(*state, FileState::Open, "only an open file can be closed")?;
        *state = FileState::Closed;
        debug!(%file, "file closed");
        Ok(())
    }

    /// Read up to `count` bytes from an open file.
    ///
    /// Only the gating is modelled: no bytes are stored, so a permitted
    /// read yields an empty buffer.
    #[instrument(level = "trace", skip(self))]
    pub fn read(&self, file: NodeId, count: i64) -> NodeResult<Vec<u8>> {
        if count <= 0 {
            return Err(NodeError::argument("requested byte count must be > 0"));
        }
        let state = self.file_state(file)?;
        check_state(state, FileState::Open, "file must be open to read from it")?;
        Ok(Vec::new())
    }

    /// Mark a closed file as deleted. Terminal: nothing leaves DELETED.
    #[instrument(level = "trace", skip(self))]
    pub fn delete(&mut self, file: NodeId) -> NodeResult<()> {
        let state = self.state_mut(file)?;
        check_not_deleted(*state, "delete")?;
        check_state(*state, FileState::Closed, "file has to be closed before deleting")?;
        *state = FileState::Deleted;
        debug!(%file, "file deleted");
        Ok(())
    }

    pub(crate) fn file_base_name(&self, entry: &NodeEntry) -> NodeResult<String> {
        if entry.base_name.is_empty() {
            return Err(NodeError::invalid_state("file base name must not be empty"));
        }
        Ok(entry.base_name.clone())
    }

    fn state_mut(&mut self, file: NodeId) -> NodeResult<&mut FileState> {
        match &mut self.entry_mut(file)?.kind {
            NodeKind::File { state } => Ok(state),
            _ => Err(not_a_file(file)),
        }
    }
}

fn not_a_file(id: NodeId) -> NodeError {
    NodeError::argument(format!("node {} is not a file", id))
}

fn check_state(actual: FileState, expected: FileState, message: &str) -> NodeResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(NodeError::argument(message))
    }
}

fn check_not_deleted(actual: FileState, operation: &str) -> NodeResult<()> {
    if actual == FileState::Deleted {
        Err(NodeError::argument(format!("cannot {} a deleted file", operation)))
    } else {
        Ok(())
    }
}

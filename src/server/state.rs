use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    models::{Deletion, NewTask, Status, Task},
    server::store::{DocumentStore, StoreError},
};

#[derive(Error, Debug)]
pub enum StateError {
    #[error("task `{0}` not found")]
    NotFound(Uuid),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("task store is no longer running")]
    Closed,
}

type Result<T> = std::result::Result<T, StateError>;
type Responder<T> = oneshot::Sender<Result<T>>;

fn task_key(id: &Uuid) -> String {
    format!("task:{}", id)
}

/// Cloneable handle to the task collection.
///
/// The store itself is owned by a single command loop; every handle sends
/// commands to it and awaits the reply.
#[derive(Clone)]
pub struct TaskState {
    sender: mpsc::Sender<Command>,
}

impl TaskState {
    pub fn new<S>(store: S) -> Self
    where
        S: DocumentStore + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(32);
        tokio::spawn(command_handler(receiver, store));
        Self { sender }
    }

    async fn request<T>(&self, command: impl FnOnce(Responder<T>) -> Command) -> Result<T> {
        let (sender, receiver) = oneshot::channel();
        self.sender
            .send(command(sender))
            .await
            .map_err(|_| StateError::Closed)?;
        receiver.await.map_err(|_| StateError::Closed)?
    }

    pub async fn create_task(&self, task: NewTask) -> Result<Task> {
        self.request(|sender| Command::CreateTask { task, sender })
            .await
    }

    pub async fn read_task(&self, id: &Uuid) -> Result<Task> {
        let id = *id;
        self.request(|sender| Command::ReadTask { id, sender }).await
    }

    pub async fn update_status(&self, id: &Uuid, status: Status) -> Result<Task> {
        let id = *id;
        self.request(|sender| Command::UpdateStatus { id, status, sender })
            .await
    }

    pub async fn delete_task(&self, id: &Uuid) -> Result<Deletion> {
        let id = *id;
        self.request(|sender| Command::DeleteTask { id, sender })
            .await
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.request(|sender| Command::ListTasks { sender }).await
    }
}

#[derive(Debug)]
enum Command {
    CreateTask {
        task: NewTask,
        sender: Responder<Task>,
    },
    ReadTask {
        id: Uuid,
        sender: Responder<Task>,
    },
    UpdateStatus {
        id: Uuid,
        status: Status,
        sender: Responder<Task>,
    },
    DeleteTask {
        id: Uuid,
        sender: Responder<Deletion>,
    },
    ListTasks {
        sender: Responder<Vec<Task>>,
    },
}

async fn command_handler<S>(mut receiver: mpsc::Receiver<Command>, mut store: S)
where
    S: DocumentStore + Send,
{
    while let Some(command) = receiver.recv().await {
        match command {
            Command::CreateTask { task, sender } => {
                let _ = sender.send(create(&mut store, task));
            }
            Command::ReadTask { id, sender } => {
                let _ = sender.send(read(&store, id));
            }
            Command::UpdateStatus { id, status, sender } => {
                let _ = sender.send(update_status(&mut store, id, status));
            }
            Command::DeleteTask { id, sender } => {
                let _ = sender.send(delete(&mut store, id));
            }
            Command::ListTasks { sender } => {
                let _ = sender.send(store.list("task:").map_err(StateError::from));
            }
        }
    }
    warn!("task state loop stopped");
}

fn create<S: DocumentStore>(store: &mut S, task: NewTask) -> Result<Task> {
    let task = Task::new(task);
    store.put(&task_key(&task.id), &task)?;
    debug!(id = %task.id, "task created");
    Ok(task)
}

fn read<S: DocumentStore>(store: &S, id: Uuid) -> Result<Task> {
    store
        .get::<Task>(&task_key(&id))?
        .ok_or(StateError::NotFound(id))
}

fn update_status<S: DocumentStore>(store: &mut S, id: Uuid, status: Status) -> Result<Task> {
    let key = task_key(&id);
    let mut task = store
        .get::<Task>(&key)?
        .ok_or(StateError::NotFound(id))?;
    task.status = status;
    store.put(&key, &task)?;
    debug!(%id, %status, "task status updated");
    Ok(task)
}

fn delete<S: DocumentStore>(store: &mut S, id: Uuid) -> Result<Deletion> {
    match store.delete::<Task>(&task_key(&id))? {
        Some(_) => {
            debug!(%id, "task deleted");
            Ok(Deletion::new(id))
        }
        None => Err(StateError::NotFound(id)),
    }
}

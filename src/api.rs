use crate::models::{Deletion, NewTask, Status, StatusUpdate, Task};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("server responded {status}: {body}")]
    Status { status: StatusCode, body: String },
}

type Result<T> = std::result::Result<T, ApiError>;

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T> {
    if res.status().is_success() {
        Ok(res.json::<T>().await?)
    } else {
        let status = res.status();
        let body = res.text().await?;
        Err(ApiError::Status { status, body })
    }
}

pub async fn fetch_tasks(base_url: &str) -> Result<Vec<Task>> {
    let client = Client::new();

    let res = client.get(base_url).send().await?;
    read_json(res).await
}

pub async fn fetch_task(base_url: &str, task_id: Uuid) -> Result<Task> {
    let client = Client::new();
    let url = format!("{}/{}", base_url, task_id);

    let res = client.get(&url).send().await?;
    read_json(res).await
}

pub async fn create_task(base_url: &str, task: &NewTask) -> Result<Task> {
    let client = Client::new();

    let res = client.post(base_url).json(task).send().await?;
    read_json(res).await
}

pub async fn update_status(base_url: &str, task_id: Uuid, status: Status) -> Result<Task> {
    let client = Client::new();
    let url = format!("{}/{}", base_url, task_id);

    let res = client
        .put(&url)
        .json(&StatusUpdate { status })
        .send()
        .await?;
    read_json(res).await
}

pub async fn delete_task(base_url: &str, task_id: Uuid) -> Result<Deletion> {
    let client = Client::new();
    let url = format!("{}/{}", base_url, task_id);

    let res = client.delete(&url).send().await?;
    read_json(res).await
}

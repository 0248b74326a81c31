//! Fetching mesh files off the UI thread.
//!
//! Each request runs independently and pushes its result onto a shared queue;
//! the app drains the queue once per frame. Completion order is arbitrary.

use std::collections::VecDeque;
use std::sync::Arc;

use arm_core::{LoadEvent, LoadRequest};
use parking_lot::Mutex;

/// Results of finished fetches, waiting to be handed to the viewer
#[derive(Clone, Default)]
pub struct LoadQueue {
    events: Arc<Mutex<VecDeque<LoadEvent>>>,
}

impl LoadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: LoadEvent) {
        self.events.lock().push_back(event);
    }

    /// Take everything that has arrived so far, oldest first
    pub fn drain(&self) -> Vec<LoadEvent> {
        self.events.lock().drain(..).collect()
    }
}

/// Start fetching `request`; the result lands in `queue` and wakes the UI
pub fn spawn_fetch(request: LoadRequest, queue: LoadQueue, ctx: egui::Context) {
    tracing::debug!("Fetching '{}' from {}", request.name, request.path);

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::thread::spawn(move || {
            queue.push(read_file(request));
            ctx.request_repaint();
        });
    }

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            queue.push(fetch_url(request).await);
            ctx.request_repaint();
        });
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_file(request: LoadRequest) -> LoadEvent {
    match std::fs::read(&request.path) {
        Ok(bytes) => LoadEvent::Loaded {
            name: request.name,
            bytes,
        },
        Err(e) => LoadEvent::Failed {
            reason: format!("{}: {}", request.path, e),
            name: request.name,
        },
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_url(request: LoadRequest) -> LoadEvent {
    match fetch_bytes(&request.path).await {
        Ok(bytes) => LoadEvent::Loaded {
            name: request.name,
            bytes,
        },
        Err(reason) => LoadEvent::Failed {
            reason: format!("{}: {}", request.path, reason),
            name: request.name,
        },
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or("no window")?;
    let request = web_sys::Request::new_with_str(url).map_err(|e| format!("{:?}", e))?;
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("{:?}", e))?;
    let response: web_sys::Response = response.dyn_into().map_err(|e| format!("{:?}", e))?;

    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }

    let buffer = JsFuture::from(response.array_buffer().map_err(|e| format!("{:?}", e))?)
        .await
        .map_err(|e| format!("{:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_arrival_order() {
        let queue = LoadQueue::new();
        let producer = queue.clone();
        producer.push(LoadEvent::Loaded {
            name: "humerus".into(),
            bytes: vec![1],
        });
        producer.push(LoadEvent::Loaded {
            name: "torso".into(),
            bytes: vec![2],
        });

        let names: Vec<String> = queue.drain().iter().map(|e| e.name().to_string()).collect();
        assert_eq!(names, vec!["humerus", "torso"]);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_missing_file_becomes_failure() {
        let event = read_file(LoadRequest::new("torso", "./does/not/exist.stl"));
        match event {
            LoadEvent::Failed { name, reason } => {
                assert_eq!(name, "torso");
                assert!(reason.contains("exist.stl"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}

use crate::panel::model::PanelModel;
use anyhow::Result;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::Filter;

fn panel_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9100))
}

/// Bridge that hosts the panel HTTP endpoints and publishes session state to
/// the host UI. The panel list is independent of the map layers.
pub struct PanelBridge {
    state: Arc<RwLock<PanelModel>>,
}

impl PanelBridge {
    pub fn new() -> Self {
        let state = Arc::new(RwLock::new(PanelModel::default()));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());

        let session_route = warp::path("session")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<PanelModel>>| warp::reply::json(&*state.read().unwrap()));

        let ships_route = warp::path("ships")
            .and(warp::get())
            .and(state_filter)
            .map(|state: Arc<RwLock<PanelModel>>| {
                warp::reply::json(&state.read().unwrap().ships)
            });

        thread::spawn(move || {
            let routes = session_route.or(ships_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(panel_bind_address()).await;
            });
        });

        Self { state }
    }

    pub fn publish(&self, model: &PanelModel) -> Result<()> {
        let mut guard = self.state.write().unwrap();
        *guard = model.clone();
        println!(
            "[PANEL] status {}, ships {}, max density {}",
            guard.status,
            guard.ships.len(),
            guard.max_density
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[PANEL] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> PanelModel {
        self.state.read().unwrap().clone()
    }
}

impl Default for PanelBridge {
    fn default() -> Self {
        Self::new()
    }
}

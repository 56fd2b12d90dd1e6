use crate::fetch::{DataClient, RawBundle};
use crate::panel::PanelModel;
use crate::render::{
    wrap_toward_cursor, CirclePaint, InteractionEvent, LayerKind, LayerSpec, PointerEvent,
    RenderBackend, SourceData, SubscriptionId,
};
use crate::session::config::SessionConfig;
use crate::session::error::{ErrorKind, SessionError};
use crate::session::metrics::SessionMetrics;
use harborcore::geodata::{
    parse_ports, parse_samples, parse_visits, LngLat, PortFeature, SampleFeature, VisitRecord,
};
use harborcore::geometry::{compute_density_pruned, BufferPolygon};
use harborcore::prelude::DensityConfig;
use harborcore::style::{DensityRamp, Rgb};
use log::{info, warn};
use std::fmt;

pub const PORTS_SOURCE: &str = "ports-source";
pub const SAMPLES_SOURCE: &str = "samples-source";
pub const BUFFERS_SOURCE: &str = "buffers-source";
pub const PORT_LAYER: &str = "port-markers";
pub const SAMPLE_LAYER: &str = "sample-markers";
pub const BUFFER_LAYER: &str = "buffer-fill";

const SAMPLE_COLOR: Rgb = Rgb::new(0x2C, 0x2C, 0x2C);
const SAMPLE_RADIUS: f32 = 2.0;
const PORT_RADIUS: f32 = 5.0;
const MIN_ZOOM: f32 = 0.0;
const MAX_ZOOM: f32 = 17.0;

/// Lifecycle of one map-viewing session. `Ready` and `Failed` are terminal
/// apart from teardown; a failure keeps the structured kind and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Loading,
    Ready,
    Failed { kind: ErrorKind, message: String },
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "idle"),
            SessionStatus::Loading => write!(f, "loading"),
            SessionStatus::Ready => write!(f, "ready"),
            SessionStatus::Failed { kind, message } => {
                write!(f, "failed ({:?}): {}", kind, message)
            }
        }
    }
}

/// Owns one map view: fetches the three datasets, runs the preprocessor,
/// registers the layers, and routes pointer events to transient labels.
pub struct SessionController<B: RenderBackend> {
    config: SessionConfig,
    backend: B,
    status: SessionStatus,
    ports: Vec<PortFeature>,
    samples: Vec<SampleFeature>,
    visits: Vec<VisitRecord>,
    subscriptions: Vec<SubscriptionId>,
    registered_sources: Vec<&'static str>,
    registered_layers: Vec<&'static str>,
    metrics: SessionMetrics,
    torn_down: bool,
}

impl<B: RenderBackend> SessionController<B> {
    pub fn new(config: SessionConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            status: SessionStatus::Idle,
            ports: Vec::new(),
            samples: Vec::new(),
            visits: Vec::new(),
            subscriptions: Vec::new(),
            registered_sources: Vec::new(),
            registered_layers: Vec::new(),
            metrics: SessionMetrics::new(),
            torn_down: false,
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn visit_records(&self) -> &[VisitRecord] {
        &self.visits
    }

    pub fn ports(&self) -> &[PortFeature] {
        &self.ports
    }

    /// Fetches the three resources and runs the full load transition.
    pub async fn load(&mut self, client: &DataClient) -> Result<(), SessionError> {
        if self.load_is_blocked() {
            return Ok(());
        }
        self.status = SessionStatus::Loading;
        let bundle = match client.fetch_bundle().await {
            Ok(bundle) => bundle,
            Err(err) => return Err(self.fail(err)),
        };
        self.load_bundle(bundle)
    }

    /// Load transition over already-fetched payloads: parse, preprocess,
    /// register layers, publish visit records. All-or-nothing; on any error
    /// the session moves to `Failed` with nothing registered.
    pub fn load_bundle(&mut self, bundle: RawBundle) -> Result<(), SessionError> {
        if self.load_is_blocked() {
            return Ok(());
        }
        self.status = SessionStatus::Loading;
        match self.try_load(bundle) {
            Ok(()) => {
                self.status = SessionStatus::Ready;
                self.metrics.record_load_ok();
                info!(
                    "session ready: {} ports, {} samples, {} visit records",
                    self.ports.len(),
                    self.samples.len(),
                    self.visits.len()
                );
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// `Ready` is terminal apart from teardown: a second load on a live view
    /// must not re-register sources or strip the working ones. Only `Idle`
    /// and `Failed` sessions accept a (re-)load.
    fn load_is_blocked(&self) -> bool {
        if self.torn_down {
            warn!("ignoring load on a torn-down session");
            return true;
        }
        if self.status == SessionStatus::Ready {
            warn!("ignoring load on a ready session");
            return true;
        }
        false
    }

    fn try_load(&mut self, bundle: RawBundle) -> Result<(), SessionError> {
        let ports =
            parse_ports(&bundle.ports).map_err(|e| SessionError::from_payload(e, "ports"))?;
        let samples =
            parse_samples(&bundle.samples).map_err(|e| SessionError::from_payload(e, "samples"))?;
        let visits =
            parse_visits(&bundle.visits).map_err(|e| SessionError::from_payload(e, "visits"))?;

        let density_config = DensityConfig::with_radius_km(self.config.radius_km);
        let output = compute_density_pruned(&samples, &ports, &density_config)
            .map_err(SessionError::Validation)?;

        let register_result = self.register_layers(&output.ports, &samples, output.buffers);
        if register_result.is_err() {
            self.rollback_registration();
            return register_result;
        }

        self.ports = output.ports;
        self.samples = samples;
        self.visits = visits;
        Ok(())
    }

    fn register_layers(
        &mut self,
        ports: &[PortFeature],
        samples: &[SampleFeature],
        buffers: Vec<BufferPolygon>,
    ) -> Result<(), SessionError> {
        self.add_source(PORTS_SOURCE, SourceData::Ports(ports.to_vec()))?;
        self.add_source(SAMPLES_SOURCE, SourceData::Samples(samples.to_vec()))?;
        self.add_source(BUFFERS_SOURCE, SourceData::Buffers(buffers))?;

        self.add_layer(
            SAMPLE_LAYER,
            SAMPLES_SOURCE,
            LayerKind::Circle {
                radius: SAMPLE_RADIUS,
                paint: CirclePaint::Fixed(SAMPLE_COLOR),
            },
        )?;
        self.add_layer(
            PORT_LAYER,
            PORTS_SOURCE,
            LayerKind::Circle {
                radius: PORT_RADIUS,
                paint: CirclePaint::Ramp(DensityRamp::default()),
            },
        )?;
        self.add_layer(BUFFER_LAYER, BUFFERS_SOURCE, LayerKind::Fill { visible: false })?;

        for layer in [PORT_LAYER, SAMPLE_LAYER] {
            for event in [
                InteractionEvent::Hover,
                InteractionEvent::Leave,
                InteractionEvent::Click,
            ] {
                let id = self.backend.subscribe(layer, event);
                self.subscriptions.push(id);
            }
        }
        Ok(())
    }

    fn add_source(&mut self, id: &'static str, data: SourceData) -> Result<(), SessionError> {
        self.backend.add_source(id, data)?;
        self.registered_sources.push(id);
        Ok(())
    }

    fn add_layer(
        &mut self,
        id: &'static str,
        source: &'static str,
        kind: LayerKind,
    ) -> Result<(), SessionError> {
        self.backend.add_layer(LayerSpec {
            id: id.to_string(),
            source: source.to_string(),
            minzoom: MIN_ZOOM,
            maxzoom: MAX_ZOOM,
            kind,
        })?;
        self.registered_layers.push(id);
        Ok(())
    }

    fn rollback_registration(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.backend.unsubscribe(id);
        }
        for id in self.registered_layers.drain(..) {
            self.backend.remove_layer(id);
        }
        for id in self.registered_sources.drain(..) {
            self.backend.remove_source(id);
        }
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        warn!("session load failed: {}", err);
        self.metrics.record_load_failed();
        self.status = SessionStatus::Failed {
            kind: err.kind(),
            message: err.to_string(),
        };
        err
    }

    /// Routes one pointer event from the host's event queue. Non-blocking,
    /// never re-enters loading, and ignored after teardown or outside
    /// `Ready` so stale callbacks are dropped on the floor.
    pub fn dispatch(&mut self, event: PointerEvent) {
        if self.torn_down || self.status != SessionStatus::Ready {
            return;
        }
        match event {
            PointerEvent::Enter {
                layer,
                feature,
                cursor,
            }
            | PointerEvent::Click {
                layer,
                feature,
                cursor,
            } => {
                let Some((name, coord)) = self.feature_label(&layer, feature) else {
                    return;
                };
                let anchor = LngLat {
                    lng: wrap_toward_cursor(coord.lng, cursor.lng),
                    lat: coord.lat,
                };
                self.backend.show_label(&name, anchor);
                self.metrics.record_label();
            }
            PointerEvent::Leave { .. } => self.backend.remove_label(),
        }
    }

    fn feature_label(&self, layer: &str, index: usize) -> Option<(String, LngLat)> {
        match layer {
            PORT_LAYER => self
                .ports
                .get(index)
                .map(|port| (port.name.clone(), port.coord)),
            SAMPLE_LAYER => self.samples.get(index).map(|sample| {
                let name = sample
                    .name
                    .clone()
                    .unwrap_or_else(|| "sample".to_string());
                (name, sample.coord)
            }),
            _ => None,
        }
    }

    /// Snapshot for the presentation surface.
    pub fn panel_model(&self) -> PanelModel {
        PanelModel {
            status: self.status.to_string(),
            ships: self.visits.clone(),
            port_count: self.ports.len(),
            sample_count: self.samples.len(),
            max_density: self
                .ports
                .iter()
                .filter_map(|port| port.density)
                .max()
                .unwrap_or(0),
        }
    }

    /// Releases the held map handle and every registered callback. Safe to
    /// call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        for id in self.subscriptions.drain(..) {
            self.backend.unsubscribe(id);
        }
        self.backend.remove_label();
        self.backend.destroy();
        let (loads_ok, loads_failed, labels) = self.metrics.snapshot();
        info!(
            "session teardown: loads ok {}, loads failed {}, labels shown {}",
            loads_ok, loads_failed, labels
        );
        self.torn_down = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingBackend;

    const PORTS: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","geometry":{"type":"Point","coordinates":[0.0,0.0]},
         "properties":{"name":"Alpha Harbor"}},
        {"type":"Feature","geometry":{"type":"Point","coordinates":[10.0,10.0]},
         "properties":{"name":"Beta Quay"}}]}"#;

    const SAMPLES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","geometry":{"type":"Point","coordinates":[0.1,0.1]},
         "properties":{"name":"MV Aurora"}},
        {"type":"Feature","geometry":{"type":"Point","coordinates":[50.0,50.0]},
         "properties":{}}]}"#;

    const VISITS: &str =
        r#"[{"name":"MV Aurora","ports":["Alpha Harbor","Alpha Harbor","Beta Quay"]}]"#;

    fn bundle() -> RawBundle {
        RawBundle {
            ports: PORTS.to_string(),
            samples: SAMPLES.to_string(),
            visits: VISITS.to_string(),
        }
    }

    fn controller_with(backend: RecordingBackend) -> SessionController<RecordingBackend> {
        let config = SessionConfig::from_base_url("http://localhost", 50.0);
        SessionController::new(config, backend)
    }

    fn ready_controller() -> SessionController<RecordingBackend> {
        let mut controller = controller_with(RecordingBackend::new());
        controller.load_bundle(bundle()).unwrap();
        controller
    }

    #[test]
    fn load_reaches_ready_and_registers_everything() {
        let controller = ready_controller();
        assert_eq!(*controller.status(), SessionStatus::Ready);
        assert_eq!(controller.backend.source_count(), 3);
        assert_eq!(controller.backend.layers().len(), 3);
        // hover/leave/click on both marker layers
        assert_eq!(controller.backend.subscription_count(), 6);

        let ports = controller.ports();
        assert_eq!(ports[0].density, Some(1));
        assert_eq!(ports[1].density, Some(0));
        assert_eq!(controller.visit_records().len(), 1);

        let model = controller.panel_model();
        assert_eq!(model.status, "ready");
        assert_eq!(model.max_density, 1);
        assert_eq!(model.port_count, 2);
    }

    #[test]
    fn malformed_payload_fails_with_no_layers() {
        let mut controller = controller_with(RecordingBackend::new());
        let mut bad = bundle();
        bad.ports = "not geojson".to_string();
        let err = controller.load_bundle(bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(matches!(
            controller.status(),
            SessionStatus::Failed { kind: ErrorKind::Parse, .. }
        ));
        assert_eq!(controller.backend.layers().len(), 0);
        assert_eq!(controller.backend.source_count(), 0);

        controller.teardown();
        controller.teardown();
        assert!(controller.backend.is_destroyed());
    }

    #[tokio::test]
    async fn fetch_failure_reaches_failed_with_no_layers() {
        // Nothing listens on port 1, so every request settles with a
        // transport error and the join reports the first failure.
        let config = SessionConfig::from_base_url("http://127.0.0.1:1", 50.0);
        let client = DataClient::new(&config);
        let mut controller = SessionController::new(config, RecordingBackend::new());

        let err = controller.load(&client).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert!(matches!(
            controller.status(),
            SessionStatus::Failed { kind: ErrorKind::Fetch, .. }
        ));
        assert_eq!(controller.backend.source_count(), 0);
        assert_eq!(controller.backend.layers().len(), 0);

        controller.teardown();
        controller.teardown();
        assert!(controller.backend.is_destroyed());
    }

    #[test]
    fn second_load_on_a_ready_session_is_ignored() {
        let mut controller = ready_controller();
        controller.load_bundle(bundle()).unwrap();
        assert_eq!(*controller.status(), SessionStatus::Ready);
        assert_eq!(controller.backend.source_count(), 3);
        assert_eq!(controller.backend.layers().len(), 3);
        assert_eq!(controller.backend.subscription_count(), 6);
    }

    #[test]
    fn failed_session_accepts_a_reload() {
        let mut controller = controller_with(RecordingBackend::new());
        let mut bad = bundle();
        bad.visits = "nope".to_string();
        assert!(controller.load_bundle(bad).is_err());

        controller.load_bundle(bundle()).unwrap();
        assert_eq!(*controller.status(), SessionStatus::Ready);
        assert_eq!(controller.backend.source_count(), 3);
    }

    #[test]
    fn load_after_teardown_is_ignored() {
        let mut controller = controller_with(RecordingBackend::new());
        controller.teardown();
        controller.load_bundle(bundle()).unwrap();
        assert_eq!(*controller.status(), SessionStatus::Idle);
        assert_eq!(controller.backend.source_count(), 0);
    }

    #[test]
    fn invalid_radius_fails_validation() {
        let config = SessionConfig::from_base_url("http://localhost", 0.0);
        let mut controller = SessionController::new(config, RecordingBackend::new());
        let err = controller.load_bundle(bundle()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn render_rejection_rolls_back_partial_registration() {
        let mut backend = RecordingBackend::new();
        backend.reject_layer(PORT_LAYER);
        let mut controller = controller_with(backend);
        let err = controller.load_bundle(bundle()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Render);
        assert_eq!(controller.backend.layers().len(), 0);
        assert_eq!(controller.backend.source_count(), 0);
        assert_eq!(controller.backend.subscription_count(), 0);
    }

    #[test]
    fn hover_shows_a_label_and_leave_removes_it() {
        let mut controller = ready_controller();
        controller.dispatch(PointerEvent::Enter {
            layer: PORT_LAYER.to_string(),
            feature: 0,
            cursor: LngLat { lng: 0.2, lat: 0.1 },
        });
        let (text, anchor) = controller.backend.label().cloned().unwrap();
        assert_eq!(text, "Alpha Harbor");
        assert_eq!(anchor.lng, 0.0);

        controller.dispatch(PointerEvent::Leave {
            layer: PORT_LAYER.to_string(),
        });
        assert!(controller.backend.label().is_none());
    }

    #[test]
    fn label_anchor_wraps_across_the_antimeridian() {
        let ports = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Point","coordinates":[179.9,0.0]},
             "properties":{"name":"Edge Port"}}]}"#;
        let mut controller = controller_with(RecordingBackend::new());
        controller
            .load_bundle(RawBundle {
                ports: ports.to_string(),
                samples: SAMPLES.to_string(),
                visits: VISITS.to_string(),
            })
            .unwrap();

        controller.dispatch(PointerEvent::Enter {
            layer: PORT_LAYER.to_string(),
            feature: 0,
            cursor: LngLat {
                lng: -179.9,
                lat: 0.0,
            },
        });
        let (_, anchor) = controller.backend.label().cloned().unwrap();
        assert!((anchor.lng - (-180.1)).abs() < 1e-9);
    }

    #[test]
    fn dispatch_is_ignored_after_teardown() {
        let mut controller = ready_controller();
        controller.teardown();
        controller.dispatch(PointerEvent::Enter {
            layer: PORT_LAYER.to_string(),
            feature: 0,
            cursor: LngLat { lng: 0.0, lat: 0.0 },
        });
        assert!(controller.backend.label().is_none());
    }

    #[test]
    fn sample_hover_falls_back_to_a_generic_label() {
        let mut controller = ready_controller();
        controller.dispatch(PointerEvent::Click {
            layer: SAMPLE_LAYER.to_string(),
            feature: 1,
            cursor: LngLat { lng: 50.0, lat: 50.0 },
        });
        let (text, _) = controller.backend.label().cloned().unwrap();
        assert_eq!(text, "sample");
    }
}

use crate::geodata::{PortFeature, SampleFeature};
use crate::geometry::buffer::geodesic_buffer;
use crate::geometry::grid::SampleGrid;
use crate::prelude::{DensityConfig, DensityOutput, GeoResult};
use log::debug;

// Rough km-per-degree at the equator, used only to size grid cells.
const KM_PER_DEGREE: f64 = 111.32;

/// Annotates each port with the count of samples inside its geodesic buffer.
/// Pure over its inputs: port order is preserved, `buffers[i]` is the ring
/// for `ports[i]`, and the input collections are left untouched. Runs the
/// exact point-in-polygon test against every sample, O(P x S).
pub fn compute_density(
    samples: &[SampleFeature],
    ports: &[PortFeature],
    config: &DensityConfig,
) -> GeoResult<DensityOutput> {
    config.validate()?;
    validate_samples(samples)?;

    let mut annotated = Vec::with_capacity(ports.len());
    let mut buffers = Vec::with_capacity(ports.len());
    for port in ports {
        let buffer = geodesic_buffer(port.coord, config.radius_km, config.buffer_steps)?;
        let count = samples
            .iter()
            .filter(|sample| buffer.contains(sample.coord))
            .count() as u32;
        if count > 0 {
            debug!("port {} density {}", port.name, count);
        }
        annotated.push(port.with_density(count));
        buffers.push(buffer);
    }

    Ok(DensityOutput {
        ports: annotated,
        buffers,
    })
}

/// Same contract as [`compute_density`], but prunes candidates through a
/// [`SampleGrid`] keyed on each buffer's bounding rectangle before the exact
/// containment test. Results are identical; only the candidate set shrinks.
pub fn compute_density_pruned(
    samples: &[SampleFeature],
    ports: &[PortFeature],
    config: &DensityConfig,
) -> GeoResult<DensityOutput> {
    config.validate()?;
    validate_samples(samples)?;

    let cell_deg = (config.radius_km / KM_PER_DEGREE).clamp(0.05, 10.0);
    let grid = SampleGrid::build(samples, cell_deg);

    let mut annotated = Vec::with_capacity(ports.len());
    let mut buffers = Vec::with_capacity(ports.len());
    for port in ports {
        let buffer = geodesic_buffer(port.coord, config.radius_km, config.buffer_steps)?;
        let count = grid
            .candidates(buffer.bounding_rect())
            .into_iter()
            .filter(|&index| buffer.contains(samples[index].coord))
            .count() as u32;
        if count > 0 {
            debug!("port {} density {}", port.name, count);
        }
        annotated.push(port.with_density(count));
        buffers.push(buffer);
    }

    Ok(DensityOutput {
        ports: annotated,
        buffers,
    })
}

fn validate_samples(samples: &[SampleFeature]) -> GeoResult<()> {
    for sample in samples {
        sample.coord.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodata::LngLat;
    use crate::prelude::GeoError;
    use geo::{Destination, Haversine, Point};
    use serde_json::Map;

    fn port(name: &str, lng: f64, lat: f64) -> PortFeature {
        PortFeature {
            name: name.to_string(),
            coord: LngLat { lng, lat },
            properties: Map::new(),
            density: None,
        }
    }

    fn sample(lng: f64, lat: f64) -> SampleFeature {
        SampleFeature {
            name: None,
            coord: LngLat { lng, lat },
            properties: Map::new(),
        }
    }

    fn config() -> DensityConfig {
        DensityConfig::default()
    }

    #[test]
    fn empty_samples_yield_zero_density_for_every_port() {
        let ports = vec![port("A", 0.0, 0.0), port("B", 100.0, -20.0)];
        let output = compute_density(&[], &ports, &config()).unwrap();
        assert!(output.ports.iter().all(|p| p.density == Some(0)));
        assert_eq!(output.buffers.len(), ports.len());
    }

    #[test]
    fn empty_ports_yield_empty_output() {
        let samples = vec![sample(0.0, 0.0)];
        let output = compute_density(&samples, &[], &config()).unwrap();
        assert!(output.ports.is_empty());
        assert!(output.buffers.is_empty());
    }

    #[test]
    fn sample_at_port_coordinate_counts_for_any_radius() {
        let ports = vec![port("A", 12.5, -45.0)];
        let samples = vec![sample(12.5, -45.0)];
        for radius in [0.1, 1.0, 50.0, 500.0] {
            let cfg = DensityConfig::with_radius_km(radius);
            let output = compute_density(&samples, &ports, &cfg).unwrap();
            assert_eq!(output.ports[0].density, Some(1), "radius {}", radius);
        }
    }

    #[test]
    fn nearby_sample_counts_and_far_sample_does_not() {
        // Port A at the origin; one sample ~15.7 km away, one an ocean away.
        let ports = vec![port("A", 0.0, 0.0)];
        let samples = vec![sample(0.1, 0.1), sample(50.0, 50.0)];
        let output = compute_density(&samples, &ports, &config()).unwrap();
        assert_eq!(output.ports[0].density, Some(1));
    }

    #[test]
    fn boundary_sample_matches_the_polygon_containment_test() {
        let ports = vec![port("A", 30.0, 10.0)];
        let origin = Point::new(30.0, 10.0);
        let on_edge = Haversine.destination(origin, 90.0, 50.0 * 1000.0);
        let samples = vec![sample(on_edge.x(), on_edge.y())];

        let output = compute_density(&samples, &ports, &config()).unwrap();
        let expected = u32::from(output.buffers[0].contains(samples[0].coord));
        assert_eq!(output.ports[0].density, Some(expected));
    }

    #[test]
    fn buffers_align_with_port_order() {
        let ports = vec![
            port("A", 0.0, 0.0),
            port("B", 10.0, 10.0),
            port("C", -10.0, -10.0),
        ];
        let output = compute_density(&[], &ports, &config()).unwrap();
        assert_eq!(output.buffers.len(), output.ports.len());
        for (annotated, buffer) in output.ports.iter().zip(&output.buffers) {
            assert!(buffer.contains(annotated.coord));
        }
        let names: Vec<_> = output.ports.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn densities_are_independent_across_ports() {
        let ports = vec![port("A", 0.0, 0.0), port("B", 20.0, 20.0)];
        let samples = vec![sample(0.1, 0.1), sample(20.1, 20.1)];

        let both = compute_density(&samples, &ports, &config()).unwrap();
        let only_a = compute_density(&samples, &ports[..1], &config()).unwrap();
        assert_eq!(both.ports[0].density, only_a.ports[0].density);
    }

    #[test]
    fn preprocessing_is_idempotent() {
        let ports = vec![port("A", 5.0, 5.0), port("B", 5.2, 5.2)];
        let samples = vec![sample(5.1, 5.1), sample(5.3, 5.0), sample(80.0, 0.0)];
        let first = compute_density(&samples, &ports, &config()).unwrap();
        let second = compute_density(&samples, &ports, &config()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn pruned_variant_matches_naive_results() {
        let mut samples = Vec::new();
        for i in 0..20 {
            for j in 0..10 {
                samples.push(sample(-2.0 + i as f64 * 0.21, -1.0 + j as f64 * 0.19));
            }
        }
        let ports = vec![
            port("A", 0.0, 0.0),
            port("B", 1.5, 0.5),
            port("C", -179.8, 0.0),
            port("D", 60.0, 60.0),
        ];
        let naive = compute_density(&samples, &ports, &config()).unwrap();
        let pruned = compute_density_pruned(&samples, &ports, &config()).unwrap();
        assert_eq!(naive, pruned);
    }

    #[test]
    fn rejects_invalid_radius_and_malformed_samples() {
        let ports = vec![port("A", 0.0, 0.0)];
        let cfg = DensityConfig::with_radius_km(-1.0);
        assert!(matches!(
            compute_density(&[], &ports, &cfg),
            Err(GeoError::InvalidRadius(_))
        ));

        let bad = vec![sample(400.0, 0.0)];
        assert!(matches!(
            compute_density(&bad, &ports, &config()),
            Err(GeoError::InvalidCoordinate { .. })
        ));
    }
}

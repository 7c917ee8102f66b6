//! Locate command implementation

use crate::cli::LocateArgs;
use crate::dry_run::{display_planned_request, PlannedRequest};
use crate::input::read_input;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use lrsgp_client::{GpClient, GpTask};
use lrsgp_core::config::LayeredConfig;
use lrsgp_core::models::{GpParameters, LinearUnit, LinearUnitType};

pub async fn execute(
    args: &LocateArgs,
    config: &LayeredConfig,
    output: &OutputWriter,
    dry_run: bool,
) -> Result<()> {
    let client = GpClient::new(config.to_client_options())
        .context("Failed to create GP client (set --url, LRSGP_URL or url in the config file)")?;

    let task = resolve_task(&args.task);
    let input = read_input(&args.input, args.wkid)?;
    let params = build_parameters(args, input)?;

    if dry_run {
        let request = client.plan(task, &params)?;
        display_planned_request(output, &PlannedRequest::new(task, request, client.max_url_length()))?;
        return Ok(());
    }

    tracing::info!(task = %task, url = %client.task_url(task), "Locating features along routes");

    let result = client.execute(task, &params).await?;

    if output.is_json() {
        output.result(&result)?;
    } else {
        output.success(format!("Located {} feature(s) ({})", result.len(), task));
        output.data(&result)?;
    }

    Ok(())
}

/// `events` and `segments` are shorthands; anything else is matched as a task name
fn resolve_task(task: &str) -> GpTask {
    match task {
        "events" => GpTask::RouteEvents,
        "segments" => GpTask::RouteSegments,
        name => GpTask::from_name(name),
    }
}

fn build_parameters(args: &LocateArgs, input: lrsgp_core::FeatureSet) -> Result<GpParameters> {
    let mut params = GpParameters::with_input(input);

    params.set_route_features(args.route_features.as_deref())?;
    params.set_calculated_angle_type(args.angle_type.as_deref())?;

    if let Some(radius) = args.radius {
        params.search_radius = Some(match &args.units {
            Some(units) => LinearUnit::parse(radius, units)?,
            None => LinearUnit::new(radius, LinearUnitType::default())?,
        });
    }

    params.keep_only_the_closest_route_location = flag(args.keep_closest);
    params.include_distance_field_on_output_table = flag(args.include_distance);
    params.use_m_direction_offsetting = flag(args.m_direction_offsetting);
    params.generate_an_angle_field = flag(args.angle_field);
    params.write_the_complement_of_the_angle_to_the_angle_field = flag(args.complement_angle);

    if args.no_return_m {
        params.return_m = Some(false);
    }
    if args.no_return_z {
        params.return_z = Some(false);
    }

    params.env_out_sr = args.out_sr;
    params.env_process_sr = args.process_sr;

    Ok(params)
}

/// Unset flags are left to the service default
fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use lrsgp_core::models::{create_feature_set, AngleType, Geometry, RouteFeatures};

    fn locate_args(extra: &[&str]) -> LocateArgs {
        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: LocateArgs,
        }
        let argv = ["locate", "input.json"].iter().chain(extra.iter());
        Wrapper::parse_from(argv).args
    }

    fn input() -> lrsgp_core::FeatureSet {
        create_feature_set(vec![Geometry::point(1.0, 2.0)], None).unwrap()
    }

    #[test]
    fn test_resolve_task() {
        assert_eq!(resolve_task("events"), GpTask::RouteEvents);
        assert_eq!(resolve_task("segments"), GpTask::RouteSegments);
        assert_eq!(resolve_task("Points to Route Segments"), GpTask::RouteSegments);
        assert_eq!(resolve_task("Points to Route Events"), GpTask::RouteEvents);
    }

    #[test]
    fn test_defaults_leave_options_unset() {
        let params = build_parameters(&locate_args(&[]), input()).unwrap();

        assert!(params.input_features.is_some());
        assert_eq!(params.search_radius, None);
        assert_eq!(params.keep_only_the_closest_route_location, None);
        assert_eq!(params.return_m, Some(true));
        assert_eq!(params.return_z, Some(true));
    }

    #[test]
    fn test_flags_map_to_parameters() {
        let args = locate_args(&[
            "--radius",
            "50",
            "--units",
            "esriMeters",
            "--route-features",
            "WAPR",
            "--angle-type",
            "TANGENT",
            "--keep-closest",
            "--no-return-z",
            "--out-sr",
            "4326",
        ]);
        let params = build_parameters(&args, input()).unwrap();

        let radius = params.search_radius.unwrap();
        assert_eq!(radius.distance(), 50.0);
        assert_eq!(radius.units(), LinearUnitType::Meters);
        assert_eq!(params.route_features, Some(RouteFeatures::Wapr));
        assert_eq!(params.calculated_angle_type, Some(AngleType::Tangent));
        assert_eq!(params.keep_only_the_closest_route_location, Some(true));
        assert_eq!(params.return_z, Some(false));
        assert_eq!(params.env_out_sr, Some(4326));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(build_parameters(&locate_args(&["--radius=-1"]), input()).is_err());
        assert!(build_parameters(
            &locate_args(&["--radius", "1", "--units", "esriParsecs"]),
            input()
        )
        .is_err());
        assert!(build_parameters(&locate_args(&["--angle-type", "OBLIQUE"]), input()).is_err());
    }
}

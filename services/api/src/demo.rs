use crate::infra::area_source;
use clap::Args;
use location_select::config::DirectoryConfig;
use location_select::error::AppError;
use location_select::location::{
    GeoPoint, ListPick, Location, LocationResolver, LocationStore, MapCandidate, OptionValue,
    PickedOption, ResolutionPolicy, ResolveError, SelectionCommand,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional CSV export (area_id,area_name,city_id,city_name,lat,lng); defaults to the sample set
    #[arg(long)]
    pub(crate) areas_csv: Option<PathBuf>,
    /// Reject malformed picks and unknown places instead of clearing the selection
    #[arg(long)]
    pub(crate) strict: bool,
}

enum DemoStep {
    List(&'static str, ListPick),
    Map(&'static str, MapCandidate),
}

fn demo_steps() -> Vec<DemoStep> {
    vec![
        DemoStep::List(
            "pick 'Berlin, Kreuzberg' from the list",
            ListPick::Single(PickedOption {
                label: Some("Berlin, Kreuzberg".to_string()),
                value: Some(OptionValue::Number(8)),
            }),
        ),
        DemoStep::Map(
            "click Montmartre on the map",
            MapCandidate {
                locality: "Paris".to_string(),
                area: "Montmartre".to_string(),
                point: Some(GeoPoint::new(48.8860, 2.3430)),
            },
        ),
        DemoStep::Map(
            "click an unknown place on the map",
            MapCandidate {
                locality: "Paris".to_string(),
                area: "Centre".to_string(),
                point: Some(GeoPoint::new(48.8566, 2.3522)),
            },
        ),
        DemoStep::List(
            "multi-select two options",
            ListPick::Multiple(2),
        ),
        DemoStep::List(
            "pick 'Berlin, Mitte' from the list",
            ListPick::Single(PickedOption::with_value(7)),
        ),
        DemoStep::List("clear the list", ListPick::Cleared),
    ]
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { areas_csv, strict } = args;
    let policy = if strict {
        ResolutionPolicy::Strict
    } else {
        ResolutionPolicy::Lenient
    };

    let source = area_source(&DirectoryConfig { areas_csv })?;
    let store = Arc::new(LocationStore::new(Arc::new(source)));
    let changes: Arc<Mutex<Vec<String>>> = Arc::default();
    let recorded = changes.clone();

    let mut resolver = LocationResolver::new(store.clone(), store)
        .with_policy(policy)
        .on_change(move |location: Option<&Location>| {
            recorded
                .lock()
                .expect("change log poisoned")
                .push(describe(location));
        });
    resolver.activate();

    println!("Location select demo ({policy:?} resolution)");
    println!("Loaded {} areas:", resolver.view().options.len());
    for option in &resolver.view().options {
        println!("  - [{}] {}", option.value, option.label);
    }

    for step in demo_steps() {
        let (title, outcome) = match step {
            DemoStep::List(title, pick) => (title, resolver.select_option(pick)),
            DemoStep::Map(title, candidate) => (title, resolver.select_map_location(candidate)),
        };
        println!("\n> {title}");
        render_outcome(outcome);

        let view = resolver.view();
        println!(
            "  area: '{}' | city: '{}' | map: ({:.4}, {:.4}) pinned={} show_new_point={}",
            view.area_name,
            view.city_name,
            view.map.point.lat,
            view.map.point.lng,
            view.map.pinned,
            view.map.show_new_point
        );
    }

    println!("\nChange notifications:");
    for (index, change) in changes
        .lock()
        .expect("change log poisoned")
        .iter()
        .enumerate()
    {
        println!("  {}. {}", index + 1, change);
    }

    Ok(())
}

fn render_outcome(outcome: Result<SelectionCommand, ResolveError>) {
    match outcome {
        Ok(command) => match serde_json::to_string(&command) {
            Ok(json) => println!("  command: {json}"),
            Err(err) => println!("  command could not be rendered: {err}"),
        },
        Err(err) => println!("  rejected: {err}"),
    }
}

fn describe(location: Option<&Location>) -> String {
    match location {
        Some(location) => format!(
            "{} ({:.4}, {:.4})",
            location.area.display_name, location.point.lat, location.point.lng
        ),
        None => "cleared".to_string(),
    }
}

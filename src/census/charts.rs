//! Chart specifications for the dashboard.
//!
//! The charts are described as plotly figures (`data` traces and a `layout`), which the
//! presentation layer renders as it is. All the functions are pure.

use std::collections::HashMap;

use census_religion::*;
use serde_json::json;
use serde_json::Value as JSValue;

const BUDAPEST_LON: f64 = 19.040236;
const BUDAPEST_LAT: f64 = 47.497913;
const MAP_ZOOM: f64 = 5.2;
const CHANGE_MAP_ZOOM: f64 = 4.5;
const COLOR_SCALE: &str = "Viridis";

const COUNTY_AXIS_TITLE: &str = "Közigazgatási egységek";
const COUNT_AXIS_TITLE: &str = "Vallást gyakorlók száma";
const CHANGE_AXIS_TITLE: &str = "Változás a gyakorlók számában";
const GROUP_LEGEND_TITLE: &str = "Vallás";

fn map_layout(zoom: f64) -> JSValue {
    json!({
        "mapbox": {
            "style": "white-bg",
            "center": {"lon": BUDAPEST_LON, "lat": BUDAPEST_LAT},
            "zoom": zoom,
            "bounds": {"west": 15, "east": 24, "south": 45, "north": 49},
        },
        "geo": {"fitbounds": "locations", "visible": false, "projection": {"type": "natural earth"}},
    })
}

fn bar_layout(y_title: &str, categories: &[CountyAggregate]) -> JSValue {
    let order: Vec<&str> = categories.iter().map(|c| c.county.as_str()).collect();
    json!({
        "plot_bgcolor": "white",
        "xaxis": {
            "title": {"text": COUNTY_AXIS_TITLE},
            "showgrid": false,
            "categoryorder": "array",
            "categoryarray": order,
        },
        "yaxis": {"title": {"text": y_title}, "showgrid": false},
    })
}

fn bar_trace(values: &[CountyAggregate]) -> JSValue {
    let x: Vec<&str> = values.iter().map(|c| c.county.as_str()).collect();
    let y: Vec<f64> = values.iter().map(|c| c.value).collect();
    json!({"type": "bar", "x": x, "y": y})
}

/// Number of believers of one religion per district.
///
/// A district without a value for the religion is left blank.
pub fn choropleth_map(
    table: &[DistrictRecord],
    religion: Religion,
    geojson: Option<&JSValue>,
) -> JSValue {
    let ids: Vec<&str> = table.iter().map(|r| r.id.as_str()).collect();
    let z: Vec<Option<f64>> = table.iter().map(|r| r.values.get(religion)).collect();
    let custom: Vec<[Option<f64>; 1]> = z.iter().map(|v| [*v]).collect();
    json!({
        "data": [{
            "type": "choroplethmapbox",
            "locations": ids,
            "z": z,
            "featureidkey": "properties.id",
            "geojson": geojson,
            "colorscale": COLOR_SCALE,
            "customdata": custom,
            "hovertemplate": "Érték: %{customdata[0]} fő",
            "colorbar": {"title": {"text": religion.label()}},
        }],
        "layout": map_layout(MAP_ZOOM),
    })
}

/// Change of one religion per district, in percentage points.
///
/// The colours use the unrounded values, the hover labels the rounded ones.
pub fn change_choropleth_map(
    changes: &[DistrictRecord],
    religion: Religion,
    geojson: Option<&JSValue>,
) -> JSValue {
    let ids: Vec<&str> = changes.iter().map(|r| r.id.as_str()).collect();
    let z: Vec<Option<f64>> = changes
        .iter()
        .map(|r| r.values.get(religion).map(|v| v * 100.0))
        .collect();
    let custom: Vec<[Option<f64>; 1]> = changes
        .iter()
        .map(|r| [r.values.get(religion).map(percentage_points)])
        .collect();
    json!({
        "data": [{
            "type": "choroplethmapbox",
            "locations": ids,
            "z": z,
            "featureidkey": "properties.id",
            "geojson": geojson,
            "colorscale": COLOR_SCALE,
            "customdata": custom,
            "hovertemplate": "Érték: %{customdata[0]}%",
            "colorbar": {"title": {"text": religion.change_label(), "side": "right"}},
        }],
        "layout": map_layout(CHANGE_MAP_ZOOM),
    })
}

/// Stacked bars of the religions of the table per county.
pub fn bar_chart_by_county(table: &[DistrictRecord]) -> JSValue {
    let columns = table_columns(table);
    let long = to_long(table, &columns);
    let order = total_by_county(&long);

    let mut traces: Vec<JSValue> = Vec::new();
    for r in columns {
        let totals: HashMap<String, f64> = total_by_county(&filter_group(&long, Group::count(r)))
            .into_iter()
            .map(|c| (c.county, c.value))
            .collect();
        let values: Vec<CountyAggregate> = order
            .iter()
            .filter_map(|c| {
                totals.get(&c.county).map(|v| CountyAggregate {
                    county: c.county.clone(),
                    value: *v,
                })
            })
            .collect();
        let mut trace = bar_trace(&values);
        trace["name"] = json!(r.key());
        traces.push(trace);
    }

    let mut layout = bar_layout(COUNT_AXIS_TITLE, &order);
    layout["barmode"] = json!("relative");
    layout["legend"] = json!({"title": {"text": GROUP_LEGEND_TITLE}});
    json!({"data": traces, "layout": layout})
}

/// Bars of one religion per county.
pub fn bar_chart_by_county_and_group(table: &[DistrictRecord], religion: Religion) -> JSValue {
    let long = to_long(table, &[religion]);
    let totals = total_by_county(&long);
    json!({
        "data": [bar_trace(&totals)],
        "layout": bar_layout(COUNT_AXIS_TITLE, &totals),
    })
}

/// Mean change of one religion per county, in percentage points.
pub fn bar_chart_of_changes_by_group(
    changes: &[DistrictRecord],
    religion: Religion,
) -> Result<JSValue, StatsError> {
    let long = to_long_changes(changes, &[religion]);
    let means = mean_change_by_county(&long, religion.key())?;
    let mut order = means.clone();
    order.sort_by(|a, b| b.value.total_cmp(&a.value));
    let mut trace = bar_trace(&means);
    trace["name"] = json!("average_change");
    Ok(json!({
        "data": [trace],
        "layout": bar_layout(CHANGE_AXIS_TITLE, &order),
    }))
}

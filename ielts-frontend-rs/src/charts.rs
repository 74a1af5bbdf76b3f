//! Chart.js configurations for the progress charts.

use std::rc::Rc;

use ielts_utils::{Skill, SkillLevels, progress::HistoryEntry};
use serde_json::{Value, json};

pub(crate) const RADAR_CHART_ID: &str = "radarChart";
pub(crate) const LINE_CHART_ID: &str = "lineChart";

/// Something that can show a Chart.js configuration on a canvas.
/// Drawing the same canvas again replaces the data of the chart already there.
pub trait ChartSurface {
    fn draw(&self, canvas_id: &str, config: &Value);
}

impl<C: ChartSurface> ChartSurface for Rc<C> {
    fn draw(&self, canvas_id: &str, config: &Value) {
        (**self).draw(canvas_id, config)
    }
}

pub(crate) fn skill_color(series: &str) -> &'static str {
    match series.parse::<Skill>() {
        Ok(Skill::Listening) => "rgb(255, 99, 132)",
        Ok(Skill::Reading) => "rgb(54, 162, 235)",
        Ok(Skill::Writing) => "rgb(255, 206, 86)",
        Ok(Skill::Speaking) => "rgb(75, 192, 192)",
        Err(_) => "rgb(201, 203, 207)",
    }
}

fn levels(levels: &SkillLevels) -> Vec<Option<f64>> {
    levels.iter().map(|(_, level)| level).collect()
}

/// Current against target level per skill, on the 0-9 band scale.
pub(crate) fn radar_chart(current: &SkillLevels, targets: &SkillLevels) -> Value {
    let labels: Vec<&str> = Skill::ORDER.iter().map(|skill| skill.as_str()).collect();
    json!({
        "type": "radar",
        "data": {
            "labels": labels,
            "datasets": [
                {
                    "label": "Current Skills",
                    "data": levels(current),
                    "backgroundColor": "rgba(255, 99, 132, 0.2)",
                    "borderColor": "rgb(255, 99, 132)",
                    "pointBackgroundColor": "rgb(255, 99, 132)",
                },
                {
                    "label": "Target Skills",
                    "data": levels(targets),
                    "backgroundColor": "rgba(54, 162, 235, 0.2)",
                    "borderColor": "rgb(54, 162, 235)",
                    "pointBackgroundColor": "rgb(54, 162, 235)",
                },
            ],
        },
        "options": {
            "elements": {"line": {"borderWidth": 3}},
            "scales": {
                "r": {
                    "angleLines": {"display": false},
                    "suggestedMin": 0,
                    "suggestedMax": 9,
                },
            },
        },
    })
}

/// One line per series of the first history entry, one point per date.
pub(crate) fn line_chart(history: &[HistoryEntry]) -> Value {
    let labels: Vec<&str> = history.iter().map(|entry| entry.date.as_str()).collect();
    let datasets: Vec<Value> = history
        .first()
        .map(|first| first.scores.keys().collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter()
        .map(|series| {
            let data: Vec<Option<f64>> = history.iter().map(|entry| entry.score(series)).collect();
            json!({
                "label": series,
                "data": data,
                "borderColor": skill_color(series),
                "fill": false,
            })
        })
        .collect();

    json!({
        "type": "line",
        "data": {"labels": labels, "datasets": datasets},
        "options": {
            "responsive": true,
            "scales": {"y": {"beginAtZero": true, "max": 9}},
            "plugins": {
                "tooltip": {"mode": "index", "intersect": false},
                "hover": {"mode": "nearest", "intersect": true},
            },
        },
    })
}

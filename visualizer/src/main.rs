use chrono::Local;
use clap::Parser;
use iced::{
    widget::{
        button, column, pick_list, row, scrollable, slider, text, Canvas, Column, Container,
    },
    Alignment, Color, Element, Length, Task, Theme,
};
use map::{tier_color, QuakeMap};
use quakecore::coordinator::{Completion, Coordinator, FetchOutcome, FetchTicket, LoadStatus};
use quakecore::encoding::{fit_viewport, EventDetail, GeoBounds, MagnitudeTier};
use quakecore::feed::{FeedClient, USGS_QUERY_ENDPOINT};
use quakecore::model::{FilterConfiguration, LookbackDays, MAX_MAGNITUDE, MIN_MAGNITUDE};
use log::{debug, info, warn};
use std::sync::Arc;

mod map;

const EVENT_LIST_LIMIT: usize = 50;

fn details_label(link: &str) -> String {
    format!("View Details → {link}")
}

#[derive(Parser)]
#[command(author, version, about = "Interactive earthquake map")]
struct Args {
    #[arg(long, default_value = USGS_QUERY_ENDPOINT)]
    feed_url: String,
    #[arg(long, default_value_t = 4.5)]
    min_magnitude: f64,
    /// Lookback window in days (1, 7 or 30)
    #[arg(long, default_value_t = 7)]
    days: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let days = LookbackDays::try_from(args.days)?;
    let filters = FilterConfiguration::new(args.min_magnitude, days)?;
    let client = Arc::new(FeedClient::from_endpoint(&args.feed_url)?);

    iced::application(
        move || Visualizer::boot(client.clone(), filters),
        Visualizer::update,
        Visualizer::view,
    )
    .title(application_title)
    .theme(application_theme)
    .run()
    .map_err(|err| anyhow::anyhow!("visualizer exited: {err}"))
}

fn application_title(_: &Visualizer) -> String {
    "Earthquake Visualizer".into()
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

struct Visualizer {
    client: Arc<FeedClient>,
    coordinator: Coordinator,
    viewport: GeoBounds,
    selected: Option<usize>,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    MagnitudeChanged(f64),
    DaysSelected(LookbackDays),
    Retry,
    Fetched(FetchOutcome),
    SelectEvent(usize),
    ClearSelection,
}

fn fetch(client: Arc<FeedClient>, ticket: FetchTicket) -> Task<Message> {
    Task::perform(
        async move { ticket.execute(&client).await },
        Message::Fetched,
    )
}

impl Visualizer {
    fn boot(client: Arc<FeedClient>, filters: FilterConfiguration) -> (Self, Task<Message>) {
        let (coordinator, ticket) = Coordinator::new(filters);
        let task = fetch(client.clone(), ticket);
        (
            Visualizer {
                client,
                coordinator,
                viewport: GeoBounds::WORLD,
                selected: None,
                history: Vec::new(),
            },
            task,
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::MagnitudeChanged(value) => {
                let next = state.coordinator.filters().with_min_magnitude(value);
                let ticket = state.coordinator.replace_filters(next);
                state.refetch(ticket)
            }
            Message::DaysSelected(days) => {
                let next = state.coordinator.filters().with_days(days);
                let ticket = state.coordinator.replace_filters(next);
                state.refetch(ticket)
            }
            Message::Retry => {
                let ticket = state.coordinator.retry();
                state.refetch(Some(ticket))
            }
            Message::Fetched(outcome) => {
                if state.coordinator.complete(outcome) == Completion::Applied {
                    state.on_applied();
                }
                Task::none()
            }
            Message::SelectEvent(index) => {
                state.selected = Some(index);
                Task::none()
            }
            Message::ClearSelection => {
                state.selected = None;
                Task::none()
            }
        }
    }

    fn refetch(&mut self, ticket: Option<FetchTicket>) -> Task<Message> {
        match ticket {
            Some(ticket) => {
                self.selected = None;
                info!("fetch #{} issued for {}", ticket.generation, ticket.filters);
                self.push_history(format!("Fetching {}", ticket.filters));
                fetch(self.client.clone(), ticket)
            }
            None => {
                debug!("filters unchanged, keeping current result");
                Task::none()
            }
        }
    }

    fn on_applied(&mut self) {
        match self.coordinator.status() {
            LoadStatus::Loaded => {
                let records = self.coordinator.displayed_records().unwrap_or_default();
                match fit_viewport(records) {
                    Some(view) => self.viewport = view,
                    None => debug!("empty result, viewport unchanged"),
                }
                let count = records.len();
                info!("displaying {count} earthquakes");
                self.push_history(format!("Loaded {count} earthquakes"));
            }
            LoadStatus::Failed(message) => {
                warn!("fetch failed: {message}");
                self.push_history("Fetch failed".into());
            }
            LoadStatus::Loading => {}
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let filters = state.coordinator.filters();

        let legend = MagnitudeTier::ALL.iter().rev().fold(
            Column::new().spacing(4).push(text("Magnitude Scale").size(14)),
            |col, tier| {
                col.push(
                    row![
                        text("●").size(14).color(tier_color(*tier)),
                        text(tier.label()).size(12)
                    ]
                    .spacing(8)
                    .align_y(Alignment::Center),
                )
            },
        );

        let controls = column![
            text("Earthquake Visualizer").size(26),
            text("Earthquake data from the USGS Earthquake Hazards Program").size(12),
            text("Filters").size(18),
            text(format!("Minimum Magnitude: {:.1}", filters.min_magnitude())).size(14),
            slider(
                MIN_MAGNITUDE..=MAX_MAGNITUDE,
                filters.min_magnitude(),
                Message::MagnitudeChanged
            )
            .step(0.5),
            text(format!("Range {MIN_MAGNITUDE:.1} to {MAX_MAGNITUDE:.1}")).size(12),
            text(format!("Time Range: {}", filters.days())).size(14),
            pick_list(LookbackDays::ALL, Some(filters.days()), Message::DaysSelected),
            text(format!(
                "{} earthquakes found",
                state.coordinator.record_count()
            ))
            .size(16),
            Container::new(legend).padding(6),
        ]
        .spacing(12)
        .padding(16)
        .width(Length::Fixed(320.0));

        let main_panel: Element<'_, Message> = match state.coordinator.status() {
            LoadStatus::Loading => Container::new(text("Loading earthquake data...").size(18))
                .center_x(Length::Fill)
                .center_y(Length::Fixed(600.0))
                .into(),
            LoadStatus::Failed(message) => Container::new(
                column![
                    text("Error Loading Data").size(20),
                    text(message.clone()).size(14),
                    button("Try Again").on_press(Message::Retry).padding(10),
                ]
                .spacing(12)
                .align_x(Alignment::Center),
            )
            .center_x(Length::Fill)
            .center_y(Length::Fixed(600.0))
            .into(),
            LoadStatus::Loaded => state.loaded_view(),
        };

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let sidebar = column![
            controls,
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10);

        let layout = row![sidebar, main_panel]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(
            column![
                layout,
                text("Data provided by the USGS Earthquake Hazards Program").size(12)
            ]
            .align_x(Alignment::Center),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    fn loaded_view(&self) -> Element<'_, Message> {
        let records = self.coordinator.displayed_records().unwrap_or_default();

        let quake_map = Canvas::new(QuakeMap::new(records, self.viewport, self.selected))
            .width(Length::Fill)
            .height(Length::Fixed(460.0));

        let event_entries = if records.is_empty() {
            Column::new().push(text("No earthquakes match these filters").size(12))
        } else {
            records.iter().enumerate().take(EVENT_LIST_LIMIT).fold(
                Column::new().spacing(4),
                |col, (index, record)| {
                    let detail = EventDetail::new(record, &Local);
                    col.push(
                        button(text(detail.headline).size(12))
                            .on_press(Message::SelectEvent(index))
                            .padding(4)
                            .width(Length::Fill),
                    )
                },
            )
        };

        let detail_panel = match self.selected.and_then(|index| records.get(index)) {
            Some(record) => {
                let detail = EventDetail::new(record, &Local);
                let mut panel = Column::new()
                    .spacing(4)
                    .push(text(detail.headline).size(18))
                    .push(text(format!("Time: {}", detail.time)).size(13))
                    .push(text(format!("Depth: {}", detail.depth)).size(13))
                    .push(text(format!("Coordinates: {}", detail.coordinates)).size(13));
                if detail.tsunami_warning {
                    panel = panel.push(
                        text("⚠ Tsunami Warning")
                            .size(14)
                            .color(Color::from_rgb8(0xdc, 0x26, 0x26)),
                    );
                }
                panel
                    .push(text(details_label(&detail.link)).size(12))
                    .push(button("Close").on_press(Message::ClearSelection).padding(6))
            }
            None => Column::new().push(text("Select an earthquake to see details").size(12)),
        };

        column![
            quake_map,
            row![
                Container::new(scrollable(event_entries).height(Length::Fixed(200.0)))
                    .padding(6)
                    .width(Length::FillPortion(3)),
                Container::new(detail_panel)
                    .padding(6)
                    .width(Length::FillPortion(2)),
            ]
            .spacing(12),
        ]
        .spacing(10)
        .width(Length::Fill)
        .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quakecore::model::EarthquakeRecord;
    use quakecore::FetchError;

    fn record(id: &str, latitude: f64, longitude: f64) -> EarthquakeRecord {
        EarthquakeRecord {
            id: id.into(),
            magnitude: Some(5.1),
            place: "Offshore".into(),
            occurred_at_millis: 1_700_000_000_000,
            latitude,
            longitude,
            depth_km: 10.0,
            detail_url: String::new(),
            tsunami_flag: 0,
            significance: 400,
        }
    }

    fn booted() -> Visualizer {
        let client = Arc::new(
            FeedClient::from_endpoint("http://127.0.0.1:9/fdsnws/event/1/query").unwrap(),
        );
        let (state, _task) = Visualizer::boot(client, FilterConfiguration::default());
        state
    }

    #[test]
    fn detail_link_is_labelled() {
        assert_eq!(
            details_label("https://earthquake.usgs.gov/earthquakes/eventpage/us1"),
            "View Details → https://earthquake.usgs.gov/earthquakes/eventpage/us1"
        );
    }

    #[test]
    fn loaded_records_refit_viewport() {
        let mut state = booted();
        let records = vec![record("a", 35.0, 139.0), record("b", 40.0, 145.0)];
        let _ = Visualizer::update(
            &mut state,
            Message::Fetched(FetchOutcome {
                generation: 1,
                result: Ok(records.clone()),
            }),
        );
        assert_eq!(state.coordinator.status(), &LoadStatus::Loaded);
        assert_eq!(Some(state.viewport), fit_viewport(&records));
    }

    #[test]
    fn empty_result_keeps_previous_viewport() {
        let mut state = booted();
        let _ = Visualizer::update(
            &mut state,
            Message::Fetched(FetchOutcome {
                generation: 1,
                result: Ok(Vec::new()),
            }),
        );
        assert_eq!(state.viewport, GeoBounds::WORLD);
        assert_eq!(state.coordinator.record_count(), 0);
    }

    #[test]
    fn filter_change_discards_in_flight_response() {
        let mut state = booted();
        let _ = Visualizer::update(&mut state, Message::DaysSelected(LookbackDays::Month));
        let _ = Visualizer::update(
            &mut state,
            Message::Fetched(FetchOutcome {
                generation: 1,
                result: Ok(vec![record("stale", 0.0, 0.0)]),
            }),
        );
        assert!(state.coordinator.is_loading());

        let _ = Visualizer::update(
            &mut state,
            Message::Fetched(FetchOutcome {
                generation: 2,
                result: Err(FetchError::status(500)),
            }),
        );
        assert!(matches!(state.coordinator.status(), LoadStatus::Failed(_)));
        assert_eq!(state.history.last().map(String::as_str), Some("Fetch failed"));

        let _ = Visualizer::update(&mut state, Message::Retry);
        assert_eq!(state.coordinator.generation(), 3);
        assert_eq!(state.coordinator.filters().days(), LookbackDays::Month);
    }

    #[test]
    fn slider_snaps_before_replacing_filters() {
        let mut state = booted();
        let _ = Visualizer::update(&mut state, Message::MagnitudeChanged(4.6));
        assert_eq!(state.coordinator.generation(), 1);
        let _ = Visualizer::update(&mut state, Message::MagnitudeChanged(6.1));
        assert_eq!(state.coordinator.filters().min_magnitude(), 6.0);
        assert_eq!(state.coordinator.generation(), 2);
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use backlot_app::{
    MediaCountry, MediaGenre, MediaLanguage, SeriesDetails, SeriesId, SeriesStatus,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;
use time::{Date, Duration, Month};

const TITLE_HEADS: [&str; 12] = [
    "Harbor", "Night", "Signal", "Paper", "Iron", "Velvet", "Hollow", "Northern", "Static",
    "Amber", "Glass", "Last",
];
const TITLE_TAILS: [&str; 12] = [
    "Lights", "Shift", "Lost", "Trail", "Season", "Protocol", "Crown", "Exposure", "Garden",
    "Verdict", "Frontier", "Broadcast",
];

const PLOT_WORDS: [&str; 24] = [
    "detective",
    "family",
    "harbor",
    "network",
    "secret",
    "newsroom",
    "hospital",
    "island",
    "dynasty",
    "heist",
    "witness",
    "archive",
    "signal",
    "border",
    "station",
    "storm",
    "verdict",
    "exile",
    "reunion",
    "debt",
    "election",
    "voyage",
    "frontier",
    "broadcast",
];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Deterministic series generator. The same seed always yields the same
/// catalog, so assertions can name concrete values.
#[derive(Debug, Clone)]
pub struct CatalogFaker {
    rng: DeterministicRng,
    next_id: i64,
}

impl CatalogFaker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: DeterministicRng::new(if seed == 0 { 1 } else { seed }),
            next_id: 1,
        }
    }

    pub fn series(&mut self) -> SeriesDetails {
        let id = self.next_id;
        self.next_id += 1;

        let title = format!("{} {}", self.pick(&TITLE_HEADS), self.pick(&TITLE_TAILS));
        let genre = MediaGenre::ALL[self.rng.int_n(MediaGenre::ALL.len())];
        let status = SeriesStatus::ALL[self.rng.int_n(SeriesStatus::ALL.len())];
        let language = MediaLanguage::ALL[self.rng.int_n(MediaLanguage::ALL.len())];
        let country = MediaCountry::ALL[self.rng.int_n(MediaCountry::ALL.len())];

        let budget = self.int_range(1_000_000, 900_000_000);
        let revenue = self.int_range(0, budget * 3);

        SeriesDetails {
            id: SeriesId::new(id),
            title,
            plot_summary: self.sentence(8, 18),
            release_date: self.release_date(),
            image_url: format!("https://img.example.com/series/{id}.jpg"),
            genre,
            status,
            original_language: language,
            origin_country: country,
            budget_cents: budget,
            net_profit_cents: revenue - budget,
            revenue_cents: revenue,
        }
    }

    fn release_date(&mut self) -> Date {
        let start = Date::from_calendar_date(REFERENCE_YEAR - 15, Month::January, 1)
            .expect("valid calendar date");
        let span_days = 15 * 365;
        start + Duration::days(self.rng.int_n(span_days) as i64)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        let count = min_words + self.rng.int_n(max_words - min_words + 1);
        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            parts.push(self.pick(&PLOT_WORDS).to_owned());
        }
        let mut sentence = parts.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }
}

/// A known-good series for tests that need concrete values rather than
/// faked ones.
pub fn sample_series(id: i64) -> SeriesDetails {
    SeriesDetails {
        id: SeriesId::new(id),
        title: "Harbor Lights".to_owned(),
        plot_summary: "A port town rebuilds after the storm of the century.".to_owned(),
        release_date: Date::from_calendar_date(2022, Month::June, 9).expect("valid calendar date"),
        image_url: format!("https://img.example.com/series/{id}.jpg"),
        genre: MediaGenre::Drama,
        status: SeriesStatus::Airing,
        original_language: MediaLanguage::English,
        origin_country: MediaCountry::UnitedKingdom,
        budget_cents: 250_000_00,
        net_profit_cents: 50_000_00,
        revenue_cents: 300_000_00,
    }
}

/// Serializes a series the way the catalog service does on the wire, for
/// mock responses.
pub fn series_wire_json(series: &SeriesDetails) -> String {
    let release_millis = series.release_date.midnight().assume_utc().unix_timestamp() * 1000;
    serde_json::json!({
        "Id": series.id.get(),
        "Title": series.title,
        "PlotSummary": series.plot_summary,
        "ReleaseDate": release_millis,
        "Image": {"Url": series.image_url},
        "AdditionalInfo": {
            "Genre": series.genre.as_str(),
            "Status": series.status.as_str(),
            "OriginalLanguage": series.original_language.as_str(),
            "OriginCountry": series.origin_country.as_str(),
        },
        "FinancialInfo": {
            "Budget": series.budget_cents,
            "NetProfit": series.net_profit_cents,
            "Revenue": series.revenue_cents,
        },
    })
    .to_string()
}

/// One-shot mock catalog service. Answers every request with the configured
/// series body and counts how many requests it saw, so tests can assert that
/// a guarded action issued exactly one request.
pub struct MockCatalog {
    pub base_url: String,
    requests: Arc<AtomicUsize>,
    handle: Option<JoinHandle<()>>,
}

impl MockCatalog {
    pub fn serve_series(series: &SeriesDetails, expected_requests: usize) -> Result<Self> {
        let server = tiny_http::Server::http("127.0.0.1:0")
            .map_err(|error| anyhow!("start mock catalog: {error}"))?;
        let base_url = format!("http://{}", server.server_addr());
        let body = series_wire_json(series);
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);

        let handle = std::thread::spawn(move || {
            for _ in 0..expected_requests {
                let request = server.recv().expect("request expected");
                counter.fetch_add(1, Ordering::SeqCst);
                let response = tiny_http::Response::from_string(body.clone())
                    .with_status_code(200)
                    .with_header(
                        tiny_http::Header::from_bytes("Content-Type", "application/json")
                            .expect("valid content type header"),
                    );
                request.respond(response).expect("response should succeed");
            }
        });

        Ok(Self {
            base_url,
            requests,
            handle: Some(handle),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn join(mut self) -> Result<usize> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("mock catalog thread panicked"))?;
        }
        Ok(self.requests.load(Ordering::SeqCst))
    }
}

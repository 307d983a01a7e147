use anyhow::Result;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tourbook_lib::render::{BlogCard, TourCard, NO_RESULTS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    /// Unknown names fall back to a table.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct TourRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Price")]
    #[serde(rename = "Price")]
    price: String,
    #[tabled(rename = "Sale")]
    #[serde(rename = "Sale")]
    sale: String,
    #[tabled(rename = "Rating")]
    #[serde(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Reviews")]
    #[serde(rename = "Reviews")]
    reviews: String,
    #[tabled(rename = "Status")]
    #[serde(rename = "Status")]
    status: String,
    #[tabled(rename = "Image")]
    #[serde(rename = "Image")]
    image: String,
}

#[derive(Tabled, Serialize)]
struct BlogRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Views")]
    #[serde(rename = "Views")]
    views: String,
    #[tabled(rename = "Excerpt")]
    #[serde(rename = "Excerpt")]
    excerpt: String,
}

// -- Row builders --

fn with_currency(amount: &str, currency: &str) -> String {
    format!("{} {}", amount, currency)
}

fn build_tour_rows(cards: &[TourCard]) -> Vec<TourRow> {
    cards
        .iter()
        .map(|c| TourRow {
            id: c.id,
            title: c.title.clone(),
            price: with_currency(&c.price, &c.currency),
            sale: c
                .sale_price
                .as_deref()
                .map(|p| with_currency(p, &c.currency))
                .unwrap_or_default(),
            rating: c.rating.clone(),
            reviews: c.reviews.clone(),
            status: c.status.clone().unwrap_or_default(),
            image: c.image.clone(),
        })
        .collect()
}

fn build_blog_rows(cards: &[BlogCard]) -> Vec<BlogRow> {
    cards
        .iter()
        .map(|c| BlogRow {
            id: c.id,
            title: c.title.clone(),
            date: c.date.clone().unwrap_or_default(),
            views: c.views.clone(),
            excerpt: c.excerpt.clone(),
        })
        .collect()
}

// -- Generic printers --

fn print_rows<T: Tabled + Serialize>(rows: Vec<T>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Json => print_json(&rows),
    }
    Ok(())
}

/// Prints tour cards. JSON output carries the cards themselves, not the table rows.
pub fn print_tours(cards: &[TourCard], format: OutputFormat) -> Result<()> {
    if cards.is_empty() && format != OutputFormat::Json {
        print_no_results();
        return Ok(());
    }
    match format {
        OutputFormat::Json => {
            print_json(&cards);
            Ok(())
        }
        _ => print_rows(build_tour_rows(cards), format),
    }
}

pub fn print_blogs(cards: &[BlogCard], format: OutputFormat) -> Result<()> {
    if cards.is_empty() && format != OutputFormat::Json {
        print_no_results();
        return Ok(());
    }
    match format {
        OutputFormat::Json => {
            print_json(&cards);
            Ok(())
        }
        _ => print_rows(build_blog_rows(cards), format),
    }
}

pub fn print_no_results() {
    eprintln!("{}", NO_RESULTS);
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

//! Content-service side of the course event pipeline.
//!
//! Publishes one `course.created` / `course.updated` event, as the content service does after
//! a successful mutation, e.g.:
//!
//! ```text
//! publish_course_event created --title "Rust 101" --category programming --tag rust --tag systems
//! ```

use clap::{Parser, ValueEnum};
use course_sync::{
    Config, CourseEventData, CourseEventPublisher, CourseEventType, CourseId,
    config::{COURSE_BINDING_KEY, COURSE_EVENTS_QUEUE, EVENTS_EXCHANGE},
};
use rabbitmq::{RabbitMQTransport, TransportSettings};
use tracing::{Level, info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Created,
    Updated,
}

impl From<Kind> for CourseEventType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Created => CourseEventType::Created,
            Kind::Updated => CourseEventType::Updated,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Publish a course event to the message broker")]
struct Args {
    /// Mutation that happened to the course
    #[arg(value_enum)]
    kind: Kind,

    /// Course id; a new UUID is generated when omitted
    #[arg(long)]
    id: Option<String>,

    /// Course title
    #[arg(long)]
    title: String,

    /// Course category
    #[arg(long)]
    category: Option<String>,

    /// Course tag, repeatable
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// App id stamped on the message (defaults to APP_ID / "similar-courses")
    #[arg(long)]
    app_id: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let args = Args::parse();
    let config = Config::try_from_env()?;

    let course_id = args.id.map(CourseId::from).unwrap_or_else(CourseId::generate);
    let mut data = CourseEventData::new(args.title);
    if let Some(category) = args.category {
        data = data.with_category(category);
    }
    if !args.tags.is_empty() {
        data = data.with_tags(args.tags);
    }

    let app_id = args.app_id.unwrap_or(config.app_id);
    let settings = TransportSettings::new(
        &config.rabbit_url,
        &app_id,
        EVENTS_EXCHANGE,
        COURSE_EVENTS_QUEUE,
        COURSE_BINDING_KEY,
    )
    .with_connect_timeout(config.broker_connect_timeout);
    let mut transport = RabbitMQTransport::new(settings);

    // The mutation already happened; a missing broker only means nobody is notified
    if transport.open().await.is_err() {
        warn!("Message broker unavailable, course {} event will not be delivered", course_id);
    }

    let publisher = CourseEventPublisher::from_transport(&mut transport);
    publisher.publish(args.kind.into(), course_id.clone(), data);
    info!("Course {} {:?} event handed to transport", course_id, args.kind);

    transport.close().await;

    Ok(())
}

use chrono::{Duration, Utc};
use sr_scheduler::{CardState, Rating, Scheduler, get_due_queue};
use strum::IntoEnumIterator;

fn setup_logger() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn print_previews(scheduler: &Scheduler, card: &CardState) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now().timestamp_millis();
    let next_states = scheduler.next_states(card, now)?;
    for rating in Rating::iter() {
        println!(
            "{rating:>5} interval: {} days",
            next_states.get(rating).interval
        );
    }
    Ok(())
}

fn schedule_new_card(scheduler: &Scheduler) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let card = scheduler.create_initial_state("new-card", now.timestamp_millis())?;

    print_previews(scheduler, &card)?;

    // Assume the learner answered `good`
    let card = scheduler.schedule(&card, Rating::Good, now.timestamp_millis())?;
    println!("Next review due: {}", card.due_date()?);
    println!("State: {card:?}");
    Ok(())
}

fn schedule_existing_card(scheduler: &Scheduler) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    // Reviewed four times, last interval two weeks, due today
    let card = CardState {
        id: "existing-card".into(),
        due: now.timestamp_millis(),
        interval: 14,
        ease: 2.36,
        reps: 4,
        lapses: 1,
    };

    print_previews(scheduler, &card)?;

    // Assume the learner answered `again`
    let card = scheduler.schedule(&card, Rating::Again, now.timestamp_millis())?;
    println!("Next review due: {}", card.due_date()?);
    println!("State: {card:?}");
    Ok(())
}

fn build_queue(scheduler: &Scheduler) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let deck = [3, -2, 0, -7, 10]
        .into_iter()
        .enumerate()
        .map(|(i, offset)| {
            scheduler.create_initial_state(
                format!("card-{i}"),
                (now + Duration::days(offset)).timestamp_millis(),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    for card in get_due_queue(&deck, now.timestamp_millis())? {
        println!("{} due {}", card.id, card.due_date()?);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger()?;
    let scheduler = Scheduler::new(None)?;

    println!("Scheduling a new card:");
    schedule_new_card(&scheduler)?;

    println!("\nScheduling an existing card:");
    schedule_existing_card(&scheduler)?;

    println!("\nBuilding the due queue:");
    build_queue(&scheduler)?;

    Ok(())
}

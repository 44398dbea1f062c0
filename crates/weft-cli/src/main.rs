//! Demo driver for weft.
//!
//! Builds two illustrative aspects (a greeting aspect and a messaging
//! aspect), weaves them onto plain target objects, and prints the unwoven
//! output next to the woven output so the interception is visible.

use anyhow::Result;
use clap::Parser;
use weft_core::{Advice, AspectBuilder, Weaver};
use weft_macros::weavable;

#[weavable]
trait Greeting {
    fn greet(&self, name: &str) -> weft_core::Result<String>;
}

#[weavable]
trait Messaging {
    fn deliver_message(&self, message: &str) -> weft_core::Result<String>;
}

struct SimpleGreeting;

impl Greeting for SimpleGreeting {
    fn greet(&self, name: &str) -> weft_core::Result<String> {
        Ok(format!("Hello {name}!"))
    }
}

struct SimpleMessaging;

impl Messaging for SimpleMessaging {
    fn deliver_message(&self, message: &str) -> weft_core::Result<String> {
        Ok(format!("You have a message: {message}"))
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Name greeted by the woven greeting aspect
    #[arg(long, default_value = "Ioanna")]
    name: String,

    /// Message delivered by the woven messaging aspect
    #[arg(long, default_value = "Aspect rocks!")]
    message: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Greeting aspect: log a line before and after 'greet', and substitute
    // the original print with an around-advice of its own.
    let around_name = cli.name.clone();
    let greeting_aspect = AspectBuilder::new()
        .with_targets(["Greeting"])
        .with_before_advice_for(
            Advice::new(|| println!("This is a greeting....")),
            [greeting_ops::greet()],
        )
        .with_after_advice_for(
            Advice::new(|| println!("The greeting has been done.")),
            [greeting_ops::greet()],
        )
        .with_around_advice_for(
            Advice::new(move || println!("Hello {around_name}! I'm an aspect!")),
            [greeting_ops::greet()],
        )
        .build();

    // Messaging aspect: same shape for 'deliver_message'.
    let around_message = cli.message.clone();
    let messaging_aspect = AspectBuilder::new()
        .with_targets(["Messaging"])
        .with_before_advice_for(
            Advice::new(|| println!("This is a message deliver....")),
            [messaging_ops::deliver_message()],
        )
        .with_after_advice_for(
            Advice::new(|| println!("The message has been delivered.")),
            [messaging_ops::deliver_message()],
        )
        .with_around_advice_for(
            Advice::new(move || println!("You have a message: {around_message}!")),
            [messaging_ops::deliver_message()],
        )
        .build();

    let woven_greeting: GreetingProxy<SimpleGreeting> =
        Weaver::new(greeting_aspect).weave(SimpleGreeting)?;
    let woven_messaging: MessagingProxy<SimpleMessaging> =
        Weaver::new(messaging_aspect).weave(SimpleMessaging)?;

    println!("\n-------------------------------------");
    println!("The normal output is: \n");
    println!("{}", SimpleGreeting.greet("Jo")?);
    println!("{}\n", SimpleMessaging.deliver_message("Aspect is OK...")?);
    println!("The output after the aspect weaving is:\n");

    // The woven calls print through their advice; the returned value is the
    // around-advice's no-value substitute and is deliberately ignored.
    woven_greeting.greet(&cli.name)?;
    println!();
    woven_messaging.deliver_message(&cli.message)?;
    println!("-------------------------------------\n");

    Ok(())
}

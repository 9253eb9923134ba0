//! Landing-page demo: a hero reveal, a staggered card grid and a parallax
//! backdrop driven by a simulated scroll session.
//!
//! Run with: cargo run --example landing

use std::rc::Rc;

use spark_motion::primitives::{
    ParallaxProps, RevealProps, StaggerItemProps, StaggerProps, parallax, scroll_reveal,
    stagger_container,
};
use spark_motion::state::scroll::ScrollRange;
use spark_motion::state::{timer, visibility};
use spark_motion::types::TransitionCommand;

fn print_command(label: &str, cmd: &TransitionCommand) {
    println!(
        "{label:>8} #{} -> y {:>5.1} opacity {:.1} (duration {:.2}s, delay {:.2}s)",
        cmd.element, cmd.target.y, cmd.target.opacity, cmd.transition.duration, cmd.transition.delay,
    );
}

fn main() {
    // Viewport geometry for the simulated session
    spark_motion::state::scroll::publish_viewport_height(800.0);
    spark_motion::state::scroll::publish_document_height(4000.0);

    // Hero headline slides up once it enters the viewport
    let hero = scroll_reveal(RevealProps {
        delay_ms: 200,
        on_transition: Some(Rc::new(|cmd| print_command("hero", cmd))),
        ..Default::default()
    });

    // Service cards reveal one after another under a shared gate
    let mut cards = stagger_container(StaggerProps {
        on_transition: Some(Rc::new(|cmd| print_command("card", cmd))),
        ..Default::default()
    });
    for _ in 0..3 {
        cards.item(StaggerItemProps::default());
    }

    // Backdrop drifts against scroll across the whole document
    let _backdrop = parallax(ParallaxProps {
        y_offset: 100.0,
        range: ScrollRange::Document,
        on_update: Some(Rc::new(|y| println!("backdrop -> y {y:>6.1}"))),
    });

    // Simulated session: the hero is on screen immediately, the cards
    // enter after some scrolling.
    println!("-- frame 0: hero enters");
    visibility::dispatch(hero.index(), true);
    timer::pump(16);

    println!("-- frame 30: scrolled to the cards");
    spark_motion::state::scroll::publish_scroll(480.0);
    visibility::dispatch(cards.index(), true);
    timer::pump(500);

    println!("-- frame 60: bottom of the page");
    spark_motion::state::scroll::publish_scroll(3200.0);
    timer::pump(1000);
}

use unoflow::{
    callout::CallOutResolution,
    snapshot::{HandView, TableSnapshot},
    turn::{DrawOutcome, MoveOutcome},
};

pub fn table(snapshot: &TableSnapshot) -> String {
    let color = snapshot
        .effective_color
        .map(|color| format!(" ({color})"))
        .unwrap_or_default();
    let direction = if snapshot.direction >= 0 {
        "clockwise"
    } else {
        "counter-clockwise"
    };

    let mut lines = vec![format!(
        "Top card: {}{color}, playing {direction}",
        snapshot.top_card
    )];
    lines.extend(snapshot.seats.iter().map(|seat| {
        let marker = if snapshot.current_player.as_deref() == Some(seat.name.as_str()) {
            '>'
        } else {
            ' '
        };
        format!(
            "{marker} {} [{}] {} pts: {}",
            seat.name,
            seat.avatar,
            seat.score,
            hand(&seat.hand)
        )
    }));
    if let Some(call_out) = &snapshot.call_out {
        lines.push(format!(
            "{} has one card left, `uno` within {}s!",
            call_out.target,
            call_out.remaining.as_secs()
        ));
    }
    if let Some(winner) = &snapshot.winner {
        lines.push(format!("{winner} won the game!"));
    }

    lines.join("\n") + "\n"
}

fn hand(hand: &HandView) -> String {
    match hand {
        HandView::FaceUp(cards) => cards
            .iter()
            .enumerate()
            .map(|(index, card)| format!("{}) {card}", index + 1))
            .collect::<Vec<_>>()
            .join("  "),
        HandView::FaceDown(count) => format!("{count} cards"),
    }
}

pub fn play(player: &str, outcome: &MoveOutcome) -> String {
    let played = format!("{player} played, {} is next", outcome.next_player);
    match &outcome.forced_draw {
        Some((seat, count)) => format!("{played}. {seat} draws {count}"),
        None => played,
    }
}

pub fn draw(outcome: &DrawOutcome) -> String {
    match &outcome.drawn_by {
        Some(player) => format!("{player} drew a card, {} is next", outcome.next_player),
        None => format!("Card drawn, {} is next", outcome.next_player),
    }
}

pub fn call_out(resolution: &CallOutResolution) -> String {
    if resolution.penalized {
        format!(
            "{} missed UNO and draws. {} is next",
            resolution.target, resolution.next_player
        )
    } else {
        format!("{} called UNO! {} is next", resolution.target, resolution.next_player)
    }
}

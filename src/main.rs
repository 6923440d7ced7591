use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};

use jnet_recap::finders::{
    favorite_identity, longest_duration_game, longest_game, most_frequent_opponent, role_record,
};
use jnet_recap::highlights::{GameHighlight, compute_highlights};
use jnet_recap::model::Side;
use jnet_recap::reasons::summarize_reasons;
use jnet_recap::temporal::{busiest_day, busiest_month, busiest_week, longest_drought, longest_streak};
use jnet_recap::upload::{SummaryOptions, summarize_upload};

fn main() -> Result<()> {
    env_logger::init();

    let Some(path) = parse_path_arg() else {
        return Err(anyhow!(
            "usage: jnet-recap <games.json> [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--json]"
        ));
    };
    let raw = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;

    let options = SummaryOptions {
        start: parse_date_arg("--from")?.map(day_start),
        end: parse_date_arg("--to")?.map(day_end),
    };
    let summary = summarize_upload(&raw, &options)?;

    if has_flag("--json") {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let Some(profile) = summary.profile.as_ref() else {
        println!("No games found in {path}");
        return Ok(());
    };
    let games = &summary.games;
    let user = profile.username.as_str();

    println!("Recap for {user}");
    println!(
        "Games: {} total, {} as corp, {} as runner (coverage {:.0}%)",
        profile.total_games,
        profile.corp_games,
        profile.runner_games,
        profile.coverage * 100.0
    );
    println!(
        "Time: {:.0} minutes over {} days ({:.1} games/day, {:.1} min/game)",
        summary.aggregates.total_minutes,
        summary.aggregates.total_days,
        summary.aggregates.average_games_per_day,
        summary.aggregates.average_minutes_per_game
    );

    for side in [Side::Corp, Side::Runner] {
        if let Some(record) = role_record(games, user, side) {
            println!(
                "{:?} record: {}-{} over {} decided games",
                side, record.wins, record.losses, record.total
            );
        }
        if let Some(favorite) = favorite_identity(games, user, side) {
            println!(
                "Favorite {:?} identity: {} ({} games, {} wins)",
                side, favorite.identity, favorite.games, favorite.wins
            );
        }
    }

    if let Some(opponent) = most_frequent_opponent(games, user) {
        println!(
            "Nemesis: {} ({} games, {}-{})",
            opponent.username, opponent.games, opponent.wins, opponent.losses
        );
    }
    if let Some(longest) = longest_game(games, user) {
        println!("Longest game: {} turns", longest.turn_count);
    }
    if let Some(longest) = longest_duration_game(games, user) {
        println!("Longest sitting: {:.0} minutes", longest.elapsed_minutes);
    }
    if let Some(day) = busiest_day(games, user) {
        println!("Busiest day: {} ({} games)", day.date, day.games);
    }
    if let Some(week) = busiest_week(games, user) {
        println!("Busiest week: starting {} ({} games)", week.week_start, week.games);
    }
    if let Some(month) = busiest_month(games, user) {
        println!(
            "Busiest month: {}-{:02} ({} games)",
            month.year, month.month, month.games
        );
    }
    if let Some(streak) = longest_streak(games, user) {
        println!(
            "Longest streak: {} days ({} to {})",
            streak.days, streak.start, streak.end
        );
    }
    if let Some(drought) = longest_drought(games, user) {
        println!(
            "Longest drought: {} days ({} to {})",
            drought.days, drought.start, drought.end
        );
    }

    let reasons = summarize_reasons(games, user);
    if let Some(win) = reasons.win {
        println!(
            "Most common win: {} ({}/{}, {:.0}%)",
            win.reason, win.count, win.total, win.percent
        );
    }
    if let Some(loss) = reasons.loss {
        println!(
            "Most common loss: {} ({}/{}, {:.0}%)",
            loss.reason, loss.count, loss.total, loss.percent
        );
    }

    let highlights = compute_highlights(games, user);
    print_highlight("Most credits gained", &highlights.most_credits_gained);
    print_highlight("Most cards drawn", &highlights.most_cards_drawn);
    print_highlight("Most damage done", &highlights.most_damage_done);
    print_highlight("Fake credits", &highlights.fake_credits);
    print_highlight("Fastest win (turns)", &highlights.fastest_win);
    print_highlight(
        "Least credits spent in a win",
        &highlights.least_credits_spent_win,
    );

    Ok(())
}

fn print_highlight(label: &str, highlight: &Option<GameHighlight>) {
    let Some(h) = highlight else {
        return;
    };
    let opponent = h.opponent.as_deref().unwrap_or("unknown");
    println!("{label}: {:.1} (as {:?} vs {opponent})", h.value, h.side);
}

fn parse_path_arg() -> Option<String> {
    std::env::args()
        .skip(1)
        .find(|arg| !arg.starts_with("--"))
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}

fn parse_date_arg(name: &str) -> Result<Option<NaiveDate>> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        let raw = if let Some(value) = arg.strip_prefix(&format!("{name}=")) {
            Some(value.to_string())
        } else if arg == name {
            args.get(idx + 1).cloned()
        } else {
            None
        };
        if let Some(raw) = raw {
            let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .with_context(|| format!("{name} expects YYYY-MM-DD, got {raw}"))?;
            return Ok(Some(date));
        }
    }
    Ok(None)
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(23, 59, 59)
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

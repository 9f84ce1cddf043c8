use std::collections::BTreeSet;

use crate::assets;
use crate::leaderboard::LeaderboardView;
use crate::utils::*;
use clap::Args;
use gloo::timers::callback::{Interval, Timeout};
use minion_match_core as game;
use game::{
    Card, CardIndex, Difficulty, GameStatus, ImageId, ImageSource, LeaderboardEntry, MatchEngine,
    MoveCount, PlayerName, PreparedRound, ResolveOutcome, Seconds, TICK_MILLIS,
};
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Formats whole seconds as `m:ss`.
fn format_clock(secs: Seconds) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn format_best(best_score: MoveCount) -> String {
    if best_score == 0 {
        "--".to_string()
    } else {
        best_score.to_string()
    }
}

/// Keeps a timer handle alive exactly while `wanted`, dropping it cancels the timer.
fn reconcile<T>(slot: &mut Option<T>, wanted: bool, start: impl FnOnce() -> T) {
    match (wanted, slot.is_some()) {
        (true, false) => *slot = Some(start()),
        (false, true) => *slot = None,
        _ => {}
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    PoolLoaded(Vec<ImageId>),
    Start(Difficulty),
    Restart,
    RoundLoaded {
        generation: u32,
        round: PreparedRound,
        missing: Vec<ImageId>,
    },
    PreviewTick,
    ClockTick,
    CardClick(CardIndex),
    Resolve,
    BackToMenu,
    NameInput(String),
    SaveRecord,
    ShowLeaderboard,
    HideLeaderboard,
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    index: CardIndex,
    card: Card,
    face_up: bool,
    #[prop_or_default]
    locked: bool,
    #[prop_or_default]
    missing: bool,
    callback: Callback<CardIndex>,
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    let CardProps {
        index,
        card,
        face_up,
        locked,
        missing,
        callback,
    } = props.clone();

    let mut class = classes!("card");
    if face_up {
        class.push("flipped");
    }
    if card.is_matched {
        class.push("matched");
    }
    if locked {
        class.push("locked");
    }

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("card {} clicked", index);
        callback.emit(index)
    });

    let front = if missing {
        html! { <span class="missing">{"🍌"}</span> }
    } else {
        html! { <img src={card.image.clone()} alt="minion" draggable="false"/> }
    };

    html! {
        <button {class} {onclick} disabled={locked}>
            <div class="back">{"?"}</div>
            <div class="front">{front}</div>
        </button>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a board seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Skip the image listing and use the built-in images
    #[arg(long)]
    offline: bool,
}

#[derive(Debug)]
pub(crate) struct GameView {
    engine: MatchEngine<BrowserStore>,
    forced_seed: Option<u64>,
    pool_loading: bool,
    generation: u32,
    round_loading: bool,
    missing_images: BTreeSet<ImageId>,
    leaderboard: Vec<LeaderboardEntry>,
    leaderboard_open: bool,
    player_name: String,
    new_best: bool,
    preview_interval: Option<Interval>,
    clock_interval: Option<Interval>,
    resolve_timeout: Option<Timeout>,
}

impl GameView {
    fn next_seed(&self) -> u64 {
        self.forced_seed.unwrap_or_else(js_random_seed)
    }

    /// Deals a board and preloads its images, the round begins once they are in.
    fn load_round(&mut self, ctx: &Context<Self>, difficulty: Difficulty) -> bool {
        let round = match self.engine.prepare(difficulty, self.next_seed()) {
            Ok(round) => round,
            Err(err) => {
                log::warn!("Cannot start a {} round: {}", difficulty, err);
                return false;
            }
        };

        self.clear_timers();
        self.engine.return_to_menu();
        self.new_best = false;
        self.generation = self.generation.wrapping_add(1);
        self.round_loading = true;

        let generation = self.generation;
        ctx.link().send_future(async move {
            let missing = assets::preload_images(round.images()).await;
            Msg::RoundLoaded {
                generation,
                round,
                missing,
            }
        });
        true
    }

    fn sync_timers(&mut self, ctx: &Context<Self>) {
        let plan = self.engine.timer_plan();

        reconcile(&mut self.preview_interval, plan.preview, || {
            let link = ctx.link().clone();
            Interval::new(TICK_MILLIS, move || link.send_message(Msg::PreviewTick))
        });
        reconcile(&mut self.clock_interval, plan.clock, || {
            let link = ctx.link().clone();
            Interval::new(TICK_MILLIS, move || link.send_message(Msg::ClockTick))
        });
        let delay = plan.resolve_after_millis.unwrap_or_default();
        reconcile(&mut self.resolve_timeout, plan.resolve_after_millis.is_some(), || {
            let link = ctx.link().clone();
            Timeout::new(delay, move || link.send_message(Msg::Resolve))
        });
    }

    fn clear_timers(&mut self) {
        self.preview_interval = None;
        self.clock_interval = None;
        self.resolve_timeout = None;
    }

    fn view_loading(&self) -> Html {
        html! {
            <div class="loading">
                <div class="spinner">{"🍌"}</div>
                <p>{"Loading minions..."}</p>
            </div>
        }
    }

    fn view_stats(&self) -> Html {
        let state = self.engine.state();
        let timer = match state.status() {
            GameStatus::Preview => html! {
                <div class="stat"><label>{"Wait"}</label><span>{format!("{}s", self.engine.preview_left())}</span></div>
            },
            _ => html! {
                <div class="stat"><label>{"Time"}</label><span>{format_clock(self.engine.elapsed_secs())}</span></div>
            },
        };

        html! {
            <nav class="stats">
                <div class="stat"><label>{"Moves"}</label><span>{state.moves()}</span></div>
                {timer}
                <div class="stat">
                    <label>{"Pairs"}</label>
                    <span>{format!("{}/{}", state.matches(), state.total_pairs())}</span>
                </div>
                <div class="stat"><label>{"Best"}</label><span>{format_best(state.best_score())}</span></div>
            </nav>
        }
    }

    fn view_menu(&self, ctx: &Context<Self>) -> Html {
        html! {
            <section class="menu">
                <h2>{"Choose your mission"}</h2>
                {
                    for Difficulty::ALL.into_iter().map(|difficulty| {
                        let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Start(difficulty));
                        html! {
                            <button class={classes!("start", difficulty.as_str().to_lowercase())} {onclick}>
                                {format!("{} ({} pairs)", difficulty, difficulty.pair_count())}
                            </button>
                        }
                    })
                }
                <button class="leaderboard" onclick={ctx.link().callback(|_| Msg::ShowLeaderboard)}>
                    {"🏆 Leaderboard"}
                </button>
            </section>
        }
    }

    fn view_board(&self, ctx: &Context<Self>) -> Html {
        let state = self.engine.state();
        let previewing = state.status() == GameStatus::Preview;
        let playable = state.status() == GameStatus::Playing && !self.engine.is_processing();
        let callback = ctx.link().callback(Msg::CardClick);

        html! {
            <div class={classes!("board", playable.then_some("playable"))}>
                {
                    for state.cards().iter().enumerate().map(|(index, card)| {
                        let face_up = previewing || card.is_face_up();
                        let locked = !playable || !card.is_selectable();
                        let missing = self.missing_images.contains(&card.image);
                        html! {
                            <CardView
                                key={card.id}
                                {index}
                                card={card.clone()}
                                {face_up}
                                {locked}
                                {missing}
                                callback={callback.clone()}
                            />
                        }
                    })
                }
            </div>
        }
    }

    fn view_side_panel(&self, ctx: &Context<Self>) -> Html {
        let current = self.engine.state().difficulty();

        html! {
            <aside class="controls">
                <button onclick={ctx.link().callback(|_| Msg::Restart)}>{"🔄 Restart"}</button>
                <button onclick={ctx.link().callback(|_| Msg::ShowLeaderboard)}>{"🏆 Leaderboard"}</button>
                <button onclick={ctx.link().callback(|_| Msg::BackToMenu)}>{"🏠 Menu"}</button>
                <div class="switcher">
                    {
                        for Difficulty::ALL.into_iter().map(|difficulty| {
                            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Start(difficulty));
                            html! {
                                <button class={(difficulty == current).then_some("active")} {onclick}>
                                    {difficulty.as_str()}
                                </button>
                            }
                        })
                    }
                </div>
            </aside>
        }
    }

    fn view_won(&self, ctx: &Context<Self>) -> Html {
        let state = self.engine.state();
        let can_save = PlayerName::parse(&self.player_name).is_ok();

        let oninput = ctx.link().callback(|e: InputEvent| {
            Msg::NameInput(e.target_unchecked_into::<HtmlInputElement>().value())
        });
        let onkeydown = ctx
            .link()
            .batch_callback(|e: KeyboardEvent| (e.key() == "Enter").then_some(Msg::SaveRecord));
        let onsave = ctx.link().callback(|_| Msg::SaveRecord);
        let onskip = ctx.link().callback(|_| Msg::BackToMenu);

        html! {
            <Modal>
                <dialog id="won" open=true>
                    <article>
                        <h2>{"🎉 Mission Complete!"}</h2>
                        <p>
                            {format!(
                                "{} moves in {}",
                                state.moves(),
                                format_clock(self.engine.elapsed_secs())
                            )}
                        </p>
                        if self.new_best {
                            <p class="new-best">{"New best score!"}</p>
                        }
                        <input
                            type="text"
                            placeholder="Your name"
                            maxlength={game::MAX_NAME_CHARS.to_string()}
                            value={self.player_name.clone()}
                            {oninput}
                            {onkeydown}
                        />
                        <footer>
                            <button onclick={onsave} disabled={!can_save}>{"Save Record"}</button>
                            <button class="secondary" onclick={onskip}>{"Menu"}</button>
                        </footer>
                    </article>
                </dialog>
            </Modal>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let GameProps { seed, offline } = ctx.props().clone();
        ctx.link().send_future(async move {
            Msg::PoolLoaded(assets::load_image_pool(ImageSource::default(), offline).await)
        });

        let engine = MatchEngine::new(BrowserStore);
        let leaderboard = engine.leaderboard();
        Self {
            engine,
            forced_seed: seed,
            pool_loading: true,
            generation: 0,
            round_loading: false,
            missing_images: BTreeSet::new(),
            leaderboard,
            leaderboard_open: false,
            player_name: String::new(),
            new_best: false,
            preview_interval: None,
            clock_interval: None,
            resolve_timeout: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            PoolLoaded(pool) => {
                log::info!("Loaded {} images", pool.len());
                self.engine.set_image_pool(pool);
                self.pool_loading = false;
                true
            }
            Start(difficulty) => self.load_round(ctx, difficulty),
            Restart => {
                let difficulty = self.engine.state().difficulty();
                self.load_round(ctx, difficulty)
            }
            RoundLoaded {
                generation,
                round,
                missing,
            } => {
                if generation != self.generation || !self.round_loading {
                    log::debug!("discarding stale round {}", generation);
                    false
                } else {
                    if !missing.is_empty() {
                        log::warn!("{} images failed to preload", missing.len());
                    }
                    self.missing_images = missing.into_iter().collect();
                    self.round_loading = false;
                    self.engine.begin(round);
                    true
                }
            }
            PreviewTick => self.engine.tick_preview().has_update(),
            ClockTick => self.engine.tick_clock(),
            CardClick(index) => match self.engine.flip(index) {
                Ok(outcome) => outcome.has_update(),
                Err(err) => {
                    log::warn!("click on card {}: {}", index, err);
                    false
                }
            },
            Resolve => match self.engine.resolve() {
                ResolveOutcome::Won { new_best, .. } => {
                    self.new_best = new_best;
                    true
                }
                outcome => outcome.has_update(),
            },
            BackToMenu => {
                self.round_loading = false;
                self.clear_timers();
                self.engine.return_to_menu();
                true
            }
            NameInput(name) => {
                self.player_name = name;
                true
            }
            SaveRecord => match self.engine.save_record(&self.player_name, record_stamp(utc_now())) {
                Ok(entries) => {
                    self.leaderboard = entries;
                    self.player_name.clear();
                    self.leaderboard_open = true;
                    true
                }
                Err(err) => {
                    log::debug!("not saving record: {}", err);
                    false
                }
            },
            ShowLeaderboard => {
                self.leaderboard = self.engine.leaderboard();
                !std::mem::replace(&mut self.leaderboard_open, true)
            }
            HideLeaderboard => std::mem::replace(&mut self.leaderboard_open, false),
        };

        self.sync_timers(ctx);
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let status = self.engine.status();
        let leaderboard = self.leaderboard_open.then(|| {
            let on_close = ctx.link().callback(|_| Msg::HideLeaderboard);
            html! { <LeaderboardView entries={self.leaderboard.clone()} {on_close}/> }
        });

        let body = if self.pool_loading || self.round_loading {
            self.view_loading()
        } else if !status.has_board() {
            self.view_menu(ctx)
        } else {
            html! {
                <main>
                    {self.view_board(ctx)}
                    {self.view_side_panel(ctx)}
                </main>
            }
        };

        html! {
            <div class="minion-match">
                <header>
                    <h1>{"Minion Match"}</h1>
                    {self.view_stats()}
                </header>
                {body}
                if status == GameStatus::Won {
                    {self.view_won(ctx)}
                }
                {leaderboard}
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.clear_timers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pads_seconds() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(75), "1:15");
        assert_eq!(format_clock(600), "10:00");
    }

    #[test]
    fn best_placeholder_when_unset() {
        assert_eq!(format_best(0), "--");
        assert_eq!(format_best(14), "14");
    }

    #[test]
    fn timer_slot_follows_wanted_flag() {
        let mut slot = None;

        reconcile(&mut slot, true, || 1);
        assert_eq!(slot, Some(1));

        reconcile(&mut slot, true, || 2);
        assert_eq!(slot, Some(1));

        reconcile(&mut slot, false, || 3);
        assert_eq!(slot, None);
    }
}

use minion_match_core::LeaderboardEntry;
use yew::prelude::*;

use crate::utils::Modal;

fn rank_label(index: usize) -> String {
    match index {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        _ => (index + 1).to_string(),
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct LeaderboardProps {
    pub entries: Vec<LeaderboardEntry>,
    pub on_close: Callback<()>,
}

#[function_component]
pub(crate) fn LeaderboardView(props: &LeaderboardProps) -> Html {
    let on_close = props.on_close.clone();
    let on_close_footer = props.on_close.clone();

    let rows = if props.entries.is_empty() {
        html! {
            <tr><td colspan="5" class="empty">{"No records yet. 🍌"}</td></tr>
        }
    } else {
        props
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                html! {
                    <tr key={entry.id.clone()} class={(index < 3).then_some("podium")}>
                        <td class="rank">{rank_label(index)}</td>
                        <td class="name">{&entry.name}</td>
                        <td class="moves">{entry.moves}</td>
                        <td class={classes!("mode", entry.difficulty.as_str().to_lowercase())}>
                            {entry.difficulty.initial()}
                        </td>
                        <td class="time">{format!("{}s", entry.time)}</td>
                    </tr>
                }
            })
            .collect::<Html>()
    };

    html! {
        <Modal>
            <dialog id="leaderboard" open=true>
                <article>
                    <header>
                        <h2>{"🏆 Hall of Fame"}</h2>
                        <button class="close" onclick={move |_| on_close.emit(())}>{"✕"}</button>
                    </header>
                    <table>
                        <thead>
                            <tr>
                                <th>{"Rank"}</th>
                                <th>{"Player"}</th>
                                <th>{"Moves"}</th>
                                <th>{"Mode"}</th>
                                <th>{"Time"}</th>
                            </tr>
                        </thead>
                        <tbody>{rows}</tbody>
                    </table>
                    <footer>
                        <button onclick={move |_| on_close_footer.emit(())}>{"Back to Game"}</button>
                    </footer>
                </article>
            </dialog>
        </Modal>
    }
}

//! Omega Flux entry point
//!
//! In the browser this wires the canvas to the game; natively it plays one
//! headless round and prints the outcome as JSON.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use omega_flux::Settings;
    use omega_flux::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
    use omega_flux::field::{Answer, CancelToken, Game, GameEvent, GamePhase, RevealPacer, drive};
    use omega_flux::platform::input::mouse_target;
    use omega_flux::platform::time::{now_seed, sleep_ms};
    use omega_flux::renderer::{CanvasRenderer, Layout, commands};

    /// Everything the event handlers and reveal tasks share
    struct App {
        game: RefCell<Game>,
        renderer: CanvasRenderer,
        layout: Layout,
        canvas: HtmlCanvasElement,
    }

    impl App {
        fn draw_round_start(&self) {
            let game = self.game.borrow();
            self.renderer.draw(&commands::board(&self.layout));
            if let Some(round) = &game.round {
                self.renderer.draw_one(&commands::equation_banner(&round.equation));
            }
        }

        fn draw_answer(&self, answer: &Answer) {
            self.renderer
                .draw_one(&commands::answer_highlight(&self.layout, answer.cell));
            self.renderer.draw_one(&commands::score_label());
        }

        fn max_magnitude(&self) -> f64 {
            self.game
                .borrow()
                .round
                .as_ref()
                .map(|r| r.max_magnitude)
                .unwrap_or(0.0)
        }
    }

    /// Reveal arrows until done or cancelled
    fn spawn_reveal(app: Rc<App>, pacer: RevealPacer, token: CancelToken) {
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = drive(
                pacer,
                &token,
                |speed| {
                    let arrow = app.game.borrow_mut().reveal_next(speed)?;
                    let max = app.max_magnitude();
                    app.renderer
                        .draw(&commands::arrow(&app.layout, &arrow, max));
                    Some(arrow)
                },
                sleep_ms,
            )
            .await;
            log::info!("Reveal ended after {} arrows: {:?}", outcome.revealed(), outcome);
        });
    }

    /// Count the score up, then show the final value
    fn spawn_score_countup(app: Rc<App>, score: f64) {
        wasm_bindgen_futures::spawn_local(async move {
            let animate = app.game.borrow().settings.score_countup;
            if animate {
                for value in commands::score_countup(score) {
                    app.renderer.draw(&commands::score_value(value));
                    sleep_ms(1).await;
                    if app.game.borrow().phase != GamePhase::Scoring {
                        return;
                    }
                }
            }
            app.renderer.draw(&commands::score_value(score));
            app.game.borrow_mut().finish_scoring();
        });
    }

    fn handle_click(app: &Rc<App>, event: &MouseEvent) {
        let target = mouse_target(event, &app.canvas, &app.layout);
        let result = app.game.borrow_mut().click(target);

        match result {
            GameEvent::RoundStarted => {
                app.draw_round_start();
                let (pacer, token) = {
                    let game = app.game.borrow();
                    (game.settings.slow_pacer(), game.reveal_token())
                };
                spawn_reveal(app.clone(), pacer, token);
            }
            GameEvent::Answered(answer) => {
                app.draw_answer(&answer);
                let (pacer, token) = {
                    let game = app.game.borrow();
                    (game.settings.fast_pacer(), game.reveal_token())
                };
                spawn_reveal(app.clone(), pacer, token);
                spawn_score_countup(app.clone(), answer.score);
            }
            GameEvent::ScoreDismissed => {
                let score = app
                    .game
                    .borrow()
                    .round
                    .as_ref()
                    .and_then(|r| r.answer)
                    .map(|a| a.score);
                if let Some(score) = score {
                    app.renderer.draw(&commands::score_value(score));
                }
            }
            GameEvent::Ignored => {}
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Omega Flux starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let Some(renderer) = CanvasRenderer::new(&canvas) else {
            log::error!("2D canvas context unavailable");
            return;
        };

        let settings = Settings::load();
        let layout = Layout::new(settings.grid_size);
        let game = Game::new(settings, now_seed());

        let app = Rc::new(App {
            game: RefCell::new(game),
            renderer,
            layout,
            canvas: canvas.clone(),
        });

        app.renderer.draw(&commands::board(&app.layout));
        app.renderer.draw(&commands::start_screen(&app.layout));

        let handler_app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            handle_click(&handler_app, &event);
        });
        if let Err(e) =
            canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        {
            log::error!("Failed to attach click listener: {:?}", e);
            return;
        }
        closure.forget();

        log::info!("Omega Flux running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use omega_flux::Settings;
    use omega_flux::field::{ClickTarget, Game, GridLocation};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use serde::Serialize;

    #[derive(Serialize)]
    struct RoundSummary<'a> {
        seed: u64,
        equation: String,
        max_magnitude: f64,
        revealed: usize,
        answer: Option<omega_flux::field::Answer>,
        revealed_cells: &'a [GridLocation],
    }

    env_logger::init();
    log::info!("Omega Flux (native) starting...");
    log::info!("Playing one headless round - run with `trunk serve` for the web version");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    let mut pacer = settings.slow_pacer();
    let mut game = Game::new(settings, seed);
    let grid_size = game.settings.grid_size;
    let mut player = Pcg32::seed_from_u64(seed ^ 0x5EED);

    game.click(ClickTarget::Outside);

    // Reveal a random share of the board, then guess a random cell
    let cells = game.round.as_ref().map_or(0, |r| r.remaining.len());
    let to_reveal = player.random_range(0..=cells);
    for _ in 0..to_reveal {
        if game.reveal_next(pacer.speed()).is_none() {
            break;
        }
        pacer.accelerate();
    }
    let guess = GridLocation::new(
        player.random_range(0..grid_size as i32),
        player.random_range(0..grid_size as i32),
    );
    game.click(ClickTarget::Cell(guess));

    let Some(round) = game.round.as_ref() else {
        log::error!("No round was started");
        return;
    };
    let revealed_cells = round.revealed();
    let summary = RoundSummary {
        seed,
        equation: round.equation.to_string(),
        max_magnitude: round.max_magnitude,
        revealed: revealed_cells.len(),
        answer: round.answer,
        revealed_cells: &revealed_cells,
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize round summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

//! Arena Game - A minimal TUI arena demonstrating combat_core
//!
//! This demo shows:
//! - Spawning a player and enemy waves into a World
//! - The fixed-rate tick loop with animation-delayed hit confirmation
//! - Projectile flight resolving damage on impact
//! - Healing modes, experience/level progression and the event log
//! - Saving/restoring the player's hit points through the persistence scalar

use combat_core::interfaces::Mover;
use combat_core::{
    default_constants, default_progression, default_weapons, CharacterClass, CombatEvent,
    CombatantId, CombatantSpec, HealMode, Vec2, WeaponConfig, World,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

/// Simulation step in seconds
const TICK: f64 = 0.1;
/// Delay between the attack trigger and the animation hit event
const HIT_DELAY: f64 = 0.3;
/// Projectile travel time per world unit
const PROJECTILE_SECONDS_PER_UNIT: f64 = 0.12;
/// Where the player's hit points are saved
const SAVE_PATH: &str = "arena_save.json";

/// Straight-line kinematic mover
struct KinematicMover {
    speed: f64,
}

impl Mover for KinematicMover {
    fn move_to(&mut self, position: &mut Vec2, destination: Vec2, stopping_distance: f64, dt: f64) {
        let next = position.step_toward(destination, self.speed * dt);
        if next.distance(destination) >= stopping_distance {
            *position = next;
        } else {
            *position = destination.step_toward(*position, stopping_distance);
        }
    }

    fn cancel(&mut self, _id: CombatantId) {}

    fn can_move_to(&self, _from: Vec2, _to: Vec2) -> bool {
        true
    }
}

/// A hit confirmation waiting for its animation delay
struct PendingHit {
    due_at: f64,
    attacker: CombatantId,
}

/// A projectile in flight carrying precomputed damage
struct Projectile {
    impact_at: f64,
    attacker: CombatantId,
    target: CombatantId,
    damage: f64,
}

/// Main game state
struct GameState {
    world: World,
    player: CombatantId,
    enemies: Vec<CombatantId>,
    weapons: HashMap<String, WeaponConfig>,

    time: f64,
    wave: u32,
    kills: u32,
    paused: bool,
    player_down: bool,

    pending_hits: Vec<PendingHit>,
    projectiles: Vec<Projectile>,
    messages: Vec<String>,

    rng: ChaCha8Rng,
}

impl GameState {
    fn new() -> Self {
        let mut world = World::with_seed(default_progression(), default_constants(), 0xA12E);
        world.set_mover(Box::new(KinematicMover { speed: 3.0 }));

        let weapons = default_weapons();
        let player = world.spawn(
            CombatantSpec::player("Hero").with_weapon(weapons["sword"].clone()),
        );

        let mut state = GameState {
            world,
            player,
            enemies: Vec::new(),
            weapons,
            time: 0.0,
            wave: 0,
            kills: 0,
            paused: false,
            player_down: false,
            pending_hits: Vec::new(),
            projectiles: Vec::new(),
            messages: vec!["Welcome to the arena. Keys are listed in the footer.".to_string()],
            rng: ChaCha8Rng::seed_from_u64(0xA12E),
        };
        state.spawn_wave();
        state
    }

    fn name_of(&self, id: CombatantId) -> String {
        self.world
            .combatant(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn push_message(&mut self, message: String) {
        self.messages.push(message);
        if self.messages.len() > 200 {
            self.messages.remove(0);
        }
    }

    /// Spawn a ring of enemies around the player and send them in
    fn spawn_wave(&mut self) {
        self.wave += 1;
        let center = self
            .world
            .combatant(self.player)
            .map(|c| c.position)
            .unwrap_or_default();

        let roster: &[(CharacterClass, &str, &str)] = &[
            (CharacterClass::Grunt, "Grunt", "dagger"),
            (CharacterClass::Archer, "Archer", "longbow"),
            (CharacterClass::Mage, "Mage", "fireball_staff"),
        ];

        let count = 2 + (self.wave as usize).min(4);
        for i in 0..count {
            let (class, base_name, weapon_id) = roster[self.rng.gen_range(0..roster.len())];
            let angle = self.rng.gen_range(0.0..std::f64::consts::TAU);
            let radius = self.rng.gen_range(8.0..14.0);
            let position = Vec2::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            );
            let level = 1 + (self.wave / 3).min(3);

            let id = self.world.spawn(
                CombatantSpec::new(format!("{} {}-{}", base_name, self.wave, i + 1), class)
                    .at(position)
                    .with_starting_level(level)
                    .with_weapon(self.weapons[weapon_id].clone()),
            );
            self.world.attack(id, self.player);
            self.enemies.push(id);
        }
        self.push_message(format!("Wave {} begins: {} enemies", self.wave, count));
    }

    fn living_enemies(&self) -> usize {
        self.enemies
            .iter()
            .filter(|id| self.world.combatant(**id).map(|c| !c.is_dead()).unwrap_or(false))
            .count()
    }

    /// Player input: attack the nearest living enemy
    fn order_player_attack(&mut self) {
        let Some(player) = self.world.combatant(self.player) else {
            return;
        };
        if player.is_dead() {
            return;
        }
        let player_pos = player.position;

        let mut nearest: Option<(f64, CombatantId)> = None;
        for id in &self.enemies {
            let Some(enemy) = self.world.combatant(*id) else {
                continue;
            };
            if enemy.is_dead() {
                continue;
            }
            let distance = player_pos.distance(enemy.position);
            if nearest.map(|(best, _)| distance < best).unwrap_or(true) {
                nearest = Some((distance, *id));
            }
        }

        if let Some((_, target)) = nearest {
            if self.world.attack(self.player, target) {
                let target_name = self.name_of(target);
                self.push_message(format!("Hero engages {}", target_name));
            }
        } else {
            self.push_message("No enemies left to attack".to_string());
        }
    }

    fn save_player(&mut self) {
        let Some(points) = self.world.capture_health(self.player) else {
            return;
        };
        match serde_json::to_string(&points)
            .map_err(io::Error::other)
            .and_then(|json| std::fs::write(SAVE_PATH, json))
        {
            Ok(()) => self.push_message(format!("Saved {:.0} hit points to {}", points, SAVE_PATH)),
            Err(err) => self.push_message(format!("Save failed: {}", err)),
        }
    }

    fn load_player(&mut self) {
        let loaded = std::fs::read_to_string(SAVE_PATH)
            .map_err(|e| e.to_string())
            .and_then(|json| serde_json::from_str::<f64>(&json).map_err(|e| e.to_string()));
        match loaded {
            Ok(points) => {
                self.world.restore_health(self.player, points);
                self.player_down = false;
                // Survivors re-engage the restored hero
                let enemies = self.enemies.clone();
                for enemy in enemies {
                    self.world.attack(enemy, self.player);
                }
                self.push_message(format!("Restored {:.0} hit points", points));
            }
            Err(err) => self.push_message(format!("Load failed: {}", err)),
        }
    }

    /// Advance the simulation by one step
    fn update(&mut self) {
        if self.paused {
            return;
        }
        self.time += TICK;

        // Animation hits whose delay elapsed feed back into the world
        let time = self.time;
        let mut due: Vec<CombatantId> = Vec::new();
        self.pending_hits.retain(|hit| {
            if hit.due_at <= time {
                due.push(hit.attacker);
                false
            } else {
                true
            }
        });
        for attacker in due {
            self.world.notify_animation_hit(attacker);
        }

        // Projectiles that reached their target
        let mut impacts: Vec<(CombatantId, CombatantId, f64)> = Vec::new();
        self.projectiles.retain(|p| {
            if p.impact_at <= time {
                impacts.push((p.target, p.attacker, p.damage));
                false
            } else {
                true
            }
        });
        for (target, attacker, damage) in impacts {
            self.world.apply_projectile_impact(target, Some(attacker), damage);
        }

        let events = self.world.tick(TICK);
        for event in events {
            self.handle_event(event);
        }

        if !self.player_down && self.living_enemies() == 0 {
            self.spawn_wave();
        }
    }

    fn handle_event(&mut self, event: CombatEvent) {
        match event {
            CombatEvent::AttackTriggered { attacker, .. } => {
                self.pending_hits.push(PendingHit {
                    due_at: self.time + HIT_DELAY,
                    attacker,
                });
            }
            CombatEvent::ProjectileLaunched {
                attacker,
                target,
                damage,
            } => {
                let flight = self
                    .world
                    .combatant(attacker)
                    .zip(self.world.combatant(target))
                    .map(|(a, t)| a.position.distance(t.position) * PROJECTILE_SECONDS_PER_UNIT)
                    .unwrap_or(0.5);
                self.projectiles.push(Projectile {
                    impact_at: self.time + flight,
                    attacker,
                    target,
                    damage,
                });
                let attacker_name = self.name_of(attacker);
                self.push_message(format!("{} looses a projectile", attacker_name));
            }
            CombatEvent::HitResolved {
                attacker,
                target,
                damage,
            } => {
                let message = format!(
                    "{} hits {} for {:.0}",
                    self.name_of(attacker),
                    self.name_of(target),
                    damage
                );
                self.push_message(message);
            }
            CombatEvent::Death { id, instigator } => {
                let killer = instigator
                    .map(|i| self.name_of(i))
                    .unwrap_or_else(|| "the arena".to_string());
                let message = format!("{} is slain by {}", self.name_of(id), killer);
                self.push_message(message);

                if id == self.player {
                    self.player_down = true;
                    // Stop the wave instead of letting it turn on itself
                    let enemies = self.enemies.clone();
                    for enemy in enemies {
                        self.world.cancel_action(enemy);
                    }
                    self.push_message("Hero is down. [l] load a save to return".to_string());
                } else {
                    self.kills += 1;
                }
            }
            CombatEvent::ExperienceGained { amount, total, .. } => {
                self.push_message(format!("Gained {:.0} experience ({:.0} total)", amount, total));
            }
            CombatEvent::LevelUp { level, .. } => {
                self.push_message(format!("*** Hero reaches level {} ***", level));
            }
            CombatEvent::Resurrected { id } => {
                let message = format!("{} returns to life", self.name_of(id));
                self.push_message(message);
            }
            CombatEvent::DamageTaken { .. } => {}
        }
    }
}

fn main() -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    let mut state = GameState::new();
    let tick_duration = Duration::from_millis((TICK * 1000.0) as u64);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| draw(frame, &state))?;

        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char(' ') => state.paused = !state.paused,
                    KeyCode::Char('a') => state.order_player_attack(),
                    KeyCode::Char('c') => {
                        state.world.cancel_action(state.player);
                        state.push_message("Hero disengages".to_string());
                    }
                    KeyCode::Char('h') => {
                        state.world.heal(
                            state.player,
                            30.0,
                            HealMode::Ticking {
                                duration: 3.0,
                                tick_interval: 0.5,
                            },
                        );
                        state.push_message("Drinking a potion (30 over 3s)".to_string());
                    }
                    KeyCode::Char('j') => {
                        state
                            .world
                            .heal(state.player, 20.0, HealMode::Smooth { duration: 2.0 });
                        state.push_message("Channelling a smooth heal (20 over 2s)".to_string());
                    }
                    KeyCode::Char('n') => state.spawn_wave(),
                    KeyCode::Char('s') => state.save_player(),
                    KeyCode::Char('l') => state.load_player(),
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_duration {
            state.update();
            last_tick = Instant::now();
        }
    }
}

fn draw(frame: &mut Frame, state: &GameState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(10),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_player_panel(frame, state, chunks[0]);
    draw_enemy_panel(frame, state, chunks[1]);
    draw_log_panel(frame, state, chunks[2]);

    let footer = Paragraph::new(
        "[a] attack  [c] cancel  [h] potion  [j] smooth heal  [n] wave  [s] save  [l] load  [space] pause  [q] quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);
}

fn draw_player_panel(frame: &mut Frame, state: &GameState, area: ratatui::layout::Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let Some(player) = state.world.combatant(state.player) else {
        return;
    };
    let progression = state.world.progression();
    let max_health = player.max_health(progression).max(1.0);
    let health_ratio = player.health.fraction(max_health).clamp(0.0, 1.0);

    let title = format!(
        " {} | Lv {} | Wave {} | Kills {}{} ",
        player.name,
        player.base_stats.level(),
        state.wave,
        state.kills,
        if state.paused { " | PAUSED" } else { "" },
    );
    let health_gauge = Gauge::default()
        .block(Block::default().title(title))
        .gauge_style(Style::default().fg(Color::Red))
        .ratio(health_ratio)
        .label(format!("{:.0}/{:.0}", player.health.points(), max_health));
    frame.render_widget(health_gauge, rows[0]);

    let xp_ratio = player
        .experience
        .as_ref()
        .map(|xp| player.base_stats.experience_fraction(progression, xp))
        .unwrap_or(0.0);
    let xp_gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(xp_ratio.clamp(0.0, 1.0))
        .label(format!("XP {:.0}%", xp_ratio * 100.0));
    frame.render_widget(xp_gauge, rows[1]);
}

fn draw_enemy_panel(frame: &mut Frame, state: &GameState, area: ratatui::layout::Rect) {
    let progression = state.world.progression();
    let player_pos = state
        .world
        .combatant(state.player)
        .map(|c| c.position)
        .unwrap_or_default();

    let items: Vec<ListItem> = state
        .enemies
        .iter()
        .rev()
        .take(8)
        .filter_map(|id| state.world.combatant(*id))
        .map(|enemy| {
            let max_health = enemy.max_health(progression).max(1.0);
            let distance = player_pos.distance(enemy.position);
            let line = if enemy.is_dead() {
                Line::from(Span::styled(
                    format!("  {} - slain", enemy.name),
                    Style::default().fg(Color::DarkGray),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("  {:<14}", enemy.name),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(
                        "Lv {}  {:>5.0}/{:<5.0} hp  {:>5.1}m  {}",
                        enemy.base_stats.level(),
                        enemy.health.points(),
                        max_health,
                        distance,
                        enemy
                            .fighter
                            .as_ref()
                            .map(|f| f.weapon().name.as_str())
                            .unwrap_or("-"),
                    )),
                ])
            };
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Enemies "));
    frame.render_widget(list, area);
}

fn draw_log_panel(frame: &mut Frame, state: &GameState, area: ratatui::layout::Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = state
        .messages
        .iter()
        .rev()
        .take(visible.max(1))
        .rev()
        .map(|message| ListItem::new(message.as_str()))
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Combat Log "));
    frame.render_widget(list, area);
}

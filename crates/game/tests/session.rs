use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;

use bomber::state::GameView;
use bomber::{
    CLOSE_ABNORMAL, Channel, Command, ConnectionState, Direction, GameOutcome, Inbound,
    Renderer, ScoreEntry, Session, SessionConfig, SessionToken, Status, StatusUi, Step, Tick,
    TimingConfig, Transport, TransportError,
};

#[derive(Default)]
struct Wire {
    urls: Vec<String>,
    sent: Vec<String>,
    accept: VecDeque<UnboundedReceiver<Inbound>>,
    closed: usize,
}

/// In-memory server: every queued receiver accepts one connection attempt.
#[derive(Clone, Default)]
struct MockTransport(Arc<Mutex<Wire>>);

impl MockTransport {
    fn accept_next(&self) -> UnboundedSender<Inbound> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.0.lock().unwrap().accept.push_back(rx);
        tx
    }

    fn urls(&self) -> Vec<String> {
        self.0.lock().unwrap().urls.clone()
    }

    fn sent(&self) -> Vec<String> {
        self.0.lock().unwrap().sent.clone()
    }

    fn closed(&self) -> usize {
        self.0.lock().unwrap().closed
    }
}

struct MockChannel {
    inbound: UnboundedReceiver<Inbound>,
    wire: Arc<Mutex<Wire>>,
}

#[async_trait]
impl Channel for MockChannel {
    async fn send(&mut self, frame: String) -> Result<(), TransportError> {
        self.wire.lock().unwrap().sent.push(frame);
        Ok(())
    }

    async fn recv(&mut self) -> Inbound {
        self.inbound.recv().await.unwrap_or(Inbound::Closed {
            code: CLOSE_ABNORMAL,
            reason: "server gone".to_string(),
        })
    }

    async fn close(&mut self) {
        self.wire.lock().unwrap().closed += 1;
    }
}

#[async_trait]
impl Transport for MockTransport {
    type Channel = MockChannel;

    async fn connect(&mut self, url: &str) -> Result<MockChannel, TransportError> {
        let mut wire = self.0.lock().unwrap();
        wire.urls.push(url.to_string());
        match wire.accept.pop_front() {
            Some(inbound) => Ok(MockChannel {
                inbound,
                wire: Arc::clone(&self.0),
            }),
            None => Err(TransportError::Connect("connection refused".to_string())),
        }
    }
}

#[derive(Default)]
struct Recorder {
    draws: usize,
    deaths: usize,
    last_tick: Tick,
    last_explosions: usize,
    statuses: Vec<Status>,
    scoreboard: Vec<ScoreEntry>,
    game_over: Option<GameOutcome>,
}

impl Renderer for Recorder {
    fn draw_game(&mut self, view: &GameView<'_>) {
        self.draws += 1;
        self.last_tick = view.tick();
        self.last_explosions = view.explosions().count();
    }

    fn death_effect(&mut self) {
        self.deaths += 1;
    }
}

impl StatusUi for Recorder {
    fn update_status(&mut self, status: Status) {
        self.statuses.push(status);
    }

    fn update_scoreboard(&mut self, entries: &[ScoreEntry]) {
        self.scoreboard = entries.to_vec();
    }

    fn show_game_over(&mut self, outcome: &GameOutcome) {
        self.game_over = Some(outcome.clone());
    }

    fn hide_game_over(&mut self) {
        self.game_over = None;
    }
}

struct Harness {
    transport: MockTransport,
    session: Session<MockTransport>,
    ui: Recorder,
    commands: UnboundedSender<Command>,
    command_rx: UnboundedReceiver<Command>,
}

impl Harness {
    fn new() -> Self {
        let transport = MockTransport::default();
        let session = Session::new(
            transport.clone(),
            SessionConfig::default(),
            TimingConfig::default(),
            SessionToken::new(42),
        );
        let (commands, command_rx) = mpsc::unbounded_channel();
        Self {
            transport,
            session,
            ui: Recorder::default(),
            commands,
            command_rx,
        }
    }

    async fn connected() -> (Self, UnboundedSender<Inbound>) {
        let mut harness = Self::new();
        let server = harness.transport.accept_next();
        harness.session.connect(&mut harness.ui).await;
        assert!(harness.session.is_open());
        (harness, server)
    }

    async fn step(&mut self) -> Step {
        self.session.step(&mut self.ui, &mut self.command_rx).await
    }

    async fn receive(&mut self, server: &UnboundedSender<Inbound>, frame: &str) {
        server.send(Inbound::Text(frame.to_string())).unwrap();
        assert_eq!(self.step().await, Step::Continue);
    }

    async fn command(&mut self, command: Command) {
        self.commands.send(command).unwrap();
        assert_eq!(self.step().await, Step::Continue);
    }
}

const ANN_SNAPSHOT: &str = r#"{"GameMap":{
    "players":{"1":{"id":1,"name":"Ann","x":1,"y":1,"alive":true,"kills":2}},
    "map":{"board":[["Wall","Wall","Wall"],["Wall","Empty","Wall"],["Wall","Wall","Wall"]],
           "width":3,"height":3},
    "tick_count":10
}}"#;

const DUEL_SNAPSHOT: &str = r#"{"GameMap":{
    "players":{
        "1":{"id":1,"name":"Ann","x":1,"y":1,"alive":true,"kills":0},
        "2":{"id":2,"name":"Bob","x":3,"y":1,"alive":true,"kills":1}
    },
    "map":{"board":[["Empty","Empty","Empty","Empty","Empty"]],"width":5,"height":1},
    "tick_count":20
}}"#;

#[tokio::test]
async fn connect_appends_token_and_reports_status() {
    let (harness, _server) = Harness::connected().await;

    assert_eq!(
        harness.transport.urls(),
        ["ws://127.0.0.1:3030/ws?token=42"]
    );
    assert_eq!(harness.ui.statuses.last(), Some(&Status::Connected));
    assert_eq!(harness.session.state(), ConnectionState::Open);
}

#[tokio::test]
async fn join_then_snapshot_populates_mirror() {
    let (mut harness, server) = Harness::connected().await;

    harness.command(Command::Join("Ann".to_string())).await;
    assert_eq!(harness.transport.sent(), [r#"{"JoinGame":{"name":"Ann"}}"#]);

    harness.receive(&server, ANN_SNAPSHOT).await;
    harness
        .receive(&server, r#"{"Reconnect":{"player_id":1,"success":true}}"#)
        .await;

    let sync = harness.session.synchronizer();
    let mirror = sync.mirror();
    assert_eq!(mirror.tick_count(), 10);
    assert_eq!(mirror.players[&1].name, "Ann");
    assert_eq!(mirror.board.width(), 3);
    assert_eq!(sync.identity().player_id, Some(1));
    assert_eq!(sync.identity().name.as_deref(), Some("Ann"));

    assert!(harness.ui.draws >= 2);
    assert_eq!(harness.ui.scoreboard.len(), 1);
    assert_eq!(harness.ui.scoreboard[0].kills, 2);
    assert!(harness.ui.scoreboard[0].is_me);
    assert!(harness.ui.scoreboard[0].color.is_some());
}

#[tokio::test]
async fn explosion_lives_for_five_ticks() {
    let (mut harness, server) = Harness::connected().await;

    harness.receive(&server, ANN_SNAPSHOT).await;
    harness.receive(&server, r#"{"Tick":{"tick_count":50}}"#).await;
    harness
        .receive(
            &server,
            r#"{"BombPlaced":{"bomb":{"id":7,"x":1,"y":1,"fuse_timer":30,"owner_id":1}}}"#,
        )
        .await;
    assert_eq!(harness.session.synchronizer().mirror().bombs.len(), 1);

    harness
        .receive(
            &server,
            r#"{"BombExploded":{"explosions":[{"x":1,"y":1,"timer":5}],"bombs":[]}}"#,
        )
        .await;

    let mirror = harness.session.synchronizer().mirror();
    assert!(mirror.bombs.is_empty());
    assert_eq!(mirror.explosions.len(), 1);
    assert_eq!(mirror.explosions[0].start_tick, 50);
    assert_eq!(harness.ui.last_explosions, 1);

    harness.receive(&server, r#"{"Tick":{"tick_count":54}}"#).await;
    assert_eq!(harness.session.synchronizer().mirror().explosions.len(), 1);

    harness.receive(&server, r#"{"Tick":{"tick_count":55}}"#).await;
    assert!(harness.session.synchronizer().mirror().explosions.is_empty());
    assert_eq!(harness.ui.last_explosions, 0);
    assert_eq!(harness.ui.last_tick, 55);
}

#[tokio::test]
async fn stale_tick_never_rewinds_clock() {
    let (mut harness, server) = Harness::connected().await;

    harness.receive(&server, r#"{"Tick":{"tick_count":30}}"#).await;
    harness.receive(&server, r#"{"Tick":{"tick_count":12}}"#).await;

    assert_eq!(harness.session.synchronizer().mirror().tick_count(), 30);
}

#[tokio::test]
async fn death_fires_effect_and_game_over_shows_winner() {
    let (mut harness, server) = Harness::connected().await;

    harness.receive(&server, DUEL_SNAPSHOT).await;
    assert_eq!(harness.ui.deaths, 0);

    harness
        .receive(&server, r#"{"PlayerDied":{"player_id":1}}"#)
        .await;
    assert_eq!(harness.ui.deaths, 1);
    assert_eq!(harness.ui.scoreboard[0].name, "Bob");

    let finished = DUEL_SNAPSHOT
        .replace(r#""tick_count":20"#, r#""tick_count":25,"game_over":true,"winner_id":2"#)
        .replace(
            r#""name":"Ann","x":1,"y":1,"alive":true"#,
            r#""name":"Ann","x":1,"y":1,"alive":false"#,
        );
    harness.receive(&server, &finished).await;

    assert_eq!(
        harness.ui.game_over,
        Some(GameOutcome::Winner {
            id: 2,
            name: "Bob".to_string()
        })
    );
    assert_eq!(harness.ui.statuses.last(), Some(&Status::GameOver));
    assert_eq!(harness.ui.deaths, 1);
}

#[tokio::test]
async fn malformed_frames_are_dropped() {
    let (mut harness, server) = Harness::connected().await;
    let draws = harness.ui.draws;

    harness.receive(&server, "{not json").await;
    harness
        .receive(&server, r#"{"Teleport":{"player_id":1}}"#)
        .await;

    assert!(harness.session.is_open());
    assert_eq!(harness.ui.draws, draws);

    harness.receive(&server, r#"{"Tick":{"tick_count":3}}"#).await;
    assert_eq!(harness.session.synchronizer().mirror().tick_count(), 3);
}

#[tokio::test]
async fn socket_error_only_refreshes_ui_until_close() {
    let (mut harness, server) = Harness::connected().await;
    harness.receive(&server, ANN_SNAPSHOT).await;
    harness
        .receive(&server, r#"{"Reconnect":{"player_id":1,"success":true}}"#)
        .await;
    let statuses = harness.ui.statuses.len();
    let draws = harness.ui.draws;

    server
        .send(Inbound::Error("connection reset".to_string()))
        .unwrap();
    assert_eq!(harness.step().await, Step::Continue);

    assert!(harness.ui.statuses.len() > statuses);
    assert_eq!(harness.ui.statuses[statuses], Status::Connected);
    assert_eq!(harness.ui.draws, draws);
    assert!(harness.session.is_open());
    assert_eq!(harness.session.reconnect_at(), None);
    let sync = harness.session.synchronizer();
    assert!(sync.mirror().is_present());
    assert_eq!(sync.identity().player_id, Some(1));

    server
        .send(Inbound::Closed {
            code: CLOSE_ABNORMAL,
            reason: "connection reset".to_string(),
        })
        .unwrap();
    assert_eq!(harness.step().await, Step::Continue);

    assert_eq!(harness.session.synchronizer().identity().player_id, None);
    assert!(harness.session.reconnect_at().is_some());
    assert_eq!(harness.ui.statuses.last(), Some(&Status::Disconnected));
}

#[tokio::test]
async fn legacy_identity_frame_is_ignored() {
    let (mut harness, server) = Harness::connected().await;

    harness.receive(&server, "17").await;

    assert_eq!(harness.session.synchronizer().identity().player_id, None);
    assert_eq!(harness.ui.draws, 0);
}

#[tokio::test(start_paused = true)]
async fn moves_are_throttled() {
    let (mut harness, server) = Harness::connected().await;
    harness.receive(&server, ANN_SNAPSHOT).await;

    harness.command(Command::Move(Direction::Up)).await;
    harness.command(Command::Move(Direction::Up)).await;
    assert_eq!(harness.transport.sent(), [r#"{"Move":{"dx":0,"dy":-1}}"#]);

    tokio::time::advance(Duration::from_millis(100)).await;
    harness.command(Command::Move(Direction::Left)).await;
    assert_eq!(harness.transport.sent().len(), 2);
    assert_eq!(harness.transport.sent()[1], r#"{"Move":{"dx":-1,"dy":0}}"#);

    harness.command(Command::PlaceBomb).await;
    assert_eq!(harness.transport.sent()[2], r#"{"PlaceBomb":null}"#);
}

#[tokio::test]
async fn gameplay_needs_a_running_match() {
    let (mut harness, server) = Harness::connected().await;

    harness.command(Command::PlaceBomb).await;
    harness.command(Command::Move(Direction::Down)).await;
    assert!(harness.transport.sent().is_empty());

    let finished = ANN_SNAPSHOT.replace(
        r#""tick_count":10"#,
        r#""tick_count":10,"game_over":true"#,
    );
    harness.receive(&server, &finished).await;

    harness.command(Command::PlaceBomb).await;
    assert!(harness.transport.sent().is_empty());

    harness.command(Command::Reset).await;
    assert_eq!(harness.transport.sent(), [r#"{"ResetGame":null}"#]);
}

#[tokio::test(start_paused = true)]
async fn close_clears_state_and_reconnects_after_delay() {
    let (mut harness, server) = Harness::connected().await;

    harness.receive(&server, ANN_SNAPSHOT).await;
    harness
        .receive(&server, r#"{"Reconnect":{"player_id":1,"success":true}}"#)
        .await;
    assert_eq!(harness.session.synchronizer().identity().player_id, Some(1));

    server
        .send(Inbound::Closed {
            code: CLOSE_ABNORMAL,
            reason: String::new(),
        })
        .unwrap();
    let closed_at = Instant::now();
    harness.step().await;

    let sync = harness.session.synchronizer();
    assert_eq!(sync.identity().player_id, None);
    assert!(!sync.mirror().is_present());
    assert!(sync.mirror().players.is_empty());
    assert_eq!(sync.mirror().tick_count(), 0);
    assert_eq!(harness.session.state(), ConnectionState::Disconnected);
    assert_eq!(harness.ui.statuses.last(), Some(&Status::Disconnected));
    assert_eq!(
        harness.session.reconnect_at(),
        Some(closed_at + Duration::from_millis(3000))
    );

    // Commands while down go nowhere.
    harness.command(Command::Join("Ann".to_string())).await;
    assert!(harness.transport.sent().is_empty());

    let _second = harness.transport.accept_next();
    harness.step().await;

    assert!(Instant::now() >= closed_at + Duration::from_millis(3000));
    assert_eq!(harness.transport.urls().len(), 2);
    assert!(harness.session.is_open());
    assert_eq!(harness.session.reconnect_at(), None);
    assert_eq!(harness.ui.statuses.last(), Some(&Status::Connected));
}

#[tokio::test(start_paused = true)]
async fn failed_attempts_keep_retrying() {
    let mut harness = Harness::new();

    harness.session.connect(&mut harness.ui).await;
    assert_eq!(harness.session.state(), ConnectionState::Disconnected);
    assert!(harness.session.reconnect_at().is_some());
    assert_eq!(harness.ui.statuses.last(), Some(&Status::Disconnected));

    harness.step().await;
    assert_eq!(harness.transport.urls().len(), 2);
    assert!(harness.session.reconnect_at().is_some());

    let _server = harness.transport.accept_next();
    harness.step().await;
    assert_eq!(harness.transport.urls().len(), 3);
    assert!(harness.session.is_open());
}

#[tokio::test]
async fn connect_while_open_is_a_no_op() {
    let (mut harness, _server) = Harness::connected().await;

    harness.session.connect(&mut harness.ui).await;

    assert_eq!(harness.transport.urls().len(), 1);
    assert!(harness.session.is_open());
}

#[tokio::test]
async fn closing_command_stream_shuts_down() {
    let (mut harness, _server) = Harness::connected().await;

    let (_, mut closed_rx) = mpsc::unbounded_channel::<Command>();
    let step = harness.session.step(&mut harness.ui, &mut closed_rx).await;
    assert_eq!(step, Step::Shutdown);

    harness.session.shutdown().await;
    assert_eq!(harness.transport.closed(), 1);
    assert_eq!(harness.session.state(), ConnectionState::Disconnected);
}

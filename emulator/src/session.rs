use std::fmt::Write as _;
use std::time::Duration;

use headarray_core::board::{
    CueSink, DelayPot, OUTPUT_COUNT, OutputSink, PadReader, SwitchReader,
};
use headarray_core::head_array::SENSOR_COUNT;
use headarray_core::telemetry::EventId;
use headarray_core::{
    ControllerConfig, Cue, DipSwitches, HeadArraySystem, OutputId, Sensor, SwitchStatus,
    SystemError,
};

/// Pot position used until the operator sets one (about 3 s of delay).
const DEFAULT_POT: u16 = 512;

pub const HELP_TOPICS: &[(&str, &str)] = &[
    ("press", "press <pad>                  - hold a pad (left|right|center|back)"),
    ("release", "release <pad>                - release a held pad"),
    ("user", "user on|off                  - user switch jack"),
    ("mode", "mode on|off                  - mode switch jack"),
    ("pot", "pot <0-1023>                 - delay potentiometer sample"),
    ("dip", "dip sw1|sw3 on|off           - installer DIP switches"),
    ("led", "led on|off                   - wireless module status LED"),
    ("tick", "tick [n]                     - advance n main periods"),
    ("wait", "wait <ms>                    - advance the clock by at least <ms>"),
    ("status", "status                       - show state, pads and outputs"),
    ("help", "help [topic]                 - show help for a command"),
];

/// Simulated board with latched inputs and recorded outputs.
#[derive(Debug)]
pub struct SimBoard {
    pads: [bool; SENSOR_COUNT],
    user: bool,
    mode: bool,
    dip: DipSwitches,
    pot: u16,
    wireless_led: bool,
    outputs: [bool; OUTPUT_COUNT],
    mirrors: [bool; SENSOR_COUNT],
    cues: Vec<Cue>,
}

impl SimBoard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pads: [false; SENSOR_COUNT],
            user: false,
            mode: false,
            dip: DipSwitches::default(),
            pot: DEFAULT_POT,
            wireless_led: false,
            outputs: [false; OUTPUT_COUNT],
            mirrors: [false; SENSOR_COUNT],
            cues: Vec::new(),
        }
    }

    #[must_use]
    pub fn output(&self, id: OutputId) -> bool {
        self.outputs[id.as_index()]
    }

    #[must_use]
    pub fn mirror(&self, sensor: Sensor) -> bool {
        self.mirrors[sensor.as_index()]
    }
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl PadReader for SimBoard {
    fn pad_is_active(&mut self, sensor: Sensor) -> bool {
        self.pads[sensor.as_index()]
    }
}

impl SwitchReader for SimBoard {
    fn switch_status(&mut self) -> SwitchStatus {
        SwitchStatus::new(self.user, self.mode)
    }

    fn dip_switches(&mut self) -> DipSwitches {
        self.dip
    }

    fn wireless_led_active(&mut self) -> bool {
        self.wireless_led
    }
}

impl DelayPot for SimBoard {
    fn read_delay_pot(&mut self) -> u16 {
        self.pot
    }
}

impl OutputSink for SimBoard {
    fn set_output(&mut self, id: OutputId, active: bool) {
        self.outputs[id.as_index()] = active;
    }

    fn set_wireless_pad_mirror(&mut self, sensor: Sensor, active: bool) {
        self.mirrors[sensor.as_index()] = active;
    }
}

impl CueSink for SimBoard {
    fn request_cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}

pub struct Session {
    system: HeadArraySystem,
    board: SimBoard,
    period: Duration,
    now: Duration,
    last_event: Option<EventId>,
}

impl Session {
    /// Builds a session on the default controller configuration.
    ///
    /// # Errors
    ///
    /// Propagates [`SystemError`] from building the system.
    pub fn new() -> Result<Self, SystemError> {
        Self::with_config(ControllerConfig::default())
    }

    /// # Errors
    ///
    /// Propagates [`SystemError`] from building the system.
    pub fn with_config(config: ControllerConfig) -> Result<Self, SystemError> {
        Ok(Self {
            system: HeadArraySystem::new(config)?,
            board: SimBoard::new(),
            period: config.main_period(),
            now: Duration::ZERO,
            last_event: None,
        })
    }

    /// Runs one command line and returns the lines to print.
    pub fn handle_command(&mut self, line: &str) -> Vec<String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Vec::new();
        };
        let args: Vec<&str> = words.collect();

        let result = match verb.to_ascii_lowercase().as_str() {
            "press" => self.set_pad(&args, true),
            "release" => self.set_pad(&args, false),
            "user" => parse_switch(&args).map(|on| {
                self.board.user = on;
                Vec::new()
            }),
            "mode" => parse_switch(&args).map(|on| {
                self.board.mode = on;
                Vec::new()
            }),
            "led" => parse_switch(&args).map(|on| {
                self.board.wireless_led = on;
                Vec::new()
            }),
            "pot" => self.set_pot(&args),
            "dip" => self.set_dip(&args),
            "tick" => self.tick(&args),
            "wait" => self.wait(&args),
            "status" => Ok(self.status()),
            "help" => Ok(help(args.first().copied())),
            other => Err(format!("unknown command `{other}`")),
        };

        result.unwrap_or_else(|err| vec![format!("ERR {err}")])
    }

    /// Advances the clock by `periods` main periods, returning every
    /// observable change.
    pub fn advance(&mut self, periods: u64) -> Vec<String> {
        let mut lines = Vec::new();
        for _ in 0..periods {
            let before = self.board.outputs;
            let mirrors_before = self.board.mirrors;
            self.system.run_pass(&mut self.board, self.now);

            let stamp = self.now.as_millis();
            for record in self.system.telemetry().records_since(self.last_event) {
                lines.push(format!("[{stamp:>6}ms] {}", record.event));
                self.last_event = Some(record.id);
            }
            for id in OutputId::ALL {
                let level = self.board.output(id);
                if before[id.as_index()] != level {
                    lines.push(format!("[{stamp:>6}ms] out {id} {}", on_off(level)));
                }
            }
            for sensor in Sensor::ALL {
                let level = self.board.mirror(sensor);
                if mirrors_before[sensor.as_index()] != level {
                    lines.push(format!("[{stamp:>6}ms] mirror {sensor} {}", on_off(level)));
                }
            }
            for cue in self.board.cues.drain(..) {
                lines.push(format!("[{stamp:>6}ms] cue {cue}"));
            }

            self.now += self.period;
        }
        lines
    }

    fn set_pad(&mut self, args: &[&str], active: bool) -> Result<Vec<String>, String> {
        let label = args.first().ok_or("expected a pad name")?;
        let sensor = Sensor::from_label(label).ok_or_else(|| format!("unknown pad `{label}`"))?;
        self.board.pads[sensor.as_index()] = active;
        Ok(Vec::new())
    }

    fn set_pot(&mut self, args: &[&str]) -> Result<Vec<String>, String> {
        let raw = args.first().ok_or("expected a pot sample")?;
        let sample: u16 = raw
            .parse()
            .map_err(|_| format!("invalid pot sample `{raw}`"))?;
        if sample > headarray_core::delay::MAX_POT_SAMPLE {
            return Err(format!(
                "pot sample must be at most {}",
                headarray_core::delay::MAX_POT_SAMPLE
            ));
        }
        self.board.pot = sample;
        let delay_ms = self.system.controller().config().delay_converter().convert(sample);
        Ok(vec![format!("delay {delay_ms}ms")])
    }

    fn set_dip(&mut self, args: &[&str]) -> Result<Vec<String>, String> {
        let switch = args.first().ok_or("expected sw1 or sw3")?;
        let on = parse_switch(args.get(1..).unwrap_or_default())?;
        match switch.to_ascii_lowercase().as_str() {
            "sw1" => self.board.dip.reverse_suppressed = on,
            "sw3" => self.board.dip.power_on_at_startup = on,
            other => return Err(format!("unknown DIP switch `{other}`")),
        }
        Ok(Vec::new())
    }

    fn tick(&mut self, args: &[&str]) -> Result<Vec<String>, String> {
        let count = match args.first() {
            Some(raw) => raw
                .parse()
                .map_err(|_| format!("invalid tick count `{raw}`"))?,
            None => 1,
        };
        Ok(self.advance(count))
    }

    fn wait(&mut self, args: &[&str]) -> Result<Vec<String>, String> {
        let raw = args.first().ok_or("expected a duration in ms")?;
        let ms: u64 = raw
            .parse()
            .map_err(|_| format!("invalid duration `{raw}`"))?;
        let period_ms = u64::try_from(self.period.as_millis()).unwrap_or(u64::MAX).max(1);
        Ok(self.advance(ms.div_ceil(period_ms)))
    }

    fn status(&self) -> Vec<String> {
        let mut pads = String::new();
        for sensor in Sensor::ALL {
            if self.system.digital_input_value(sensor) {
                let _ = write!(pads, " {sensor}");
            }
        }
        if self.system.pads_in_neutral_state() {
            pads.push_str(" neutral");
        }

        let mut outputs = String::new();
        for id in OutputId::ALL {
            if self.board.output(id) {
                let _ = write!(outputs, " {id}");
            }
        }
        if outputs.is_empty() {
            outputs.push_str(" none");
        }

        let controller = self.system.controller();
        let demand = controller.drive_demand();
        let demand = if demand.is_neutral() {
            "neutral".to_string()
        } else {
            format!("{:?} {:?}", demand.speed, demand.direction).to_ascii_lowercase()
        };
        let switches = controller.switches();

        vec![
            format!("t={}ms state {}", self.now.as_millis(), self.system.state()),
            format!("pads:{pads}"),
            format!("outputs:{outputs}"),
            format!("demand {demand}"),
            format!(
                "switches user {} mode {} hold {} ticks",
                on_off(switches.user_active()),
                on_off(switches.mode_active()),
                controller.switch_delay()
            ),
            format!(
                "delay floor {}ms",
                controller.config().delay_converter().floor_ms()
            ),
            format!(
                "beeping {}",
                if self.system.is_beeping_permitted() {
                    "permitted"
                } else {
                    "muted"
                }
            ),
        ]
    }
}

fn parse_switch(args: &[&str]) -> Result<bool, String> {
    match args.first().map(|arg| arg.to_ascii_lowercase()) {
        Some(arg) if arg == "on" => Ok(true),
        Some(arg) if arg == "off" => Ok(false),
        Some(arg) => Err(format!("expected on|off, got `{arg}`")),
        None => Err("expected on|off".to_string()),
    }
}

fn help(topic: Option<&str>) -> Vec<String> {
    match topic {
        None => HELP_TOPICS
            .iter()
            .map(|(_, line)| (*line).to_string())
            .collect(),
        Some(topic) => HELP_TOPICS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(topic))
            .map_or_else(
                || vec![format!("ERR no help for `{topic}`")],
                |(_, line)| vec![(*line).to_string()],
            ),
    }
}

const fn on_off(level: bool) -> &'static str {
    if level { "on" } else { "off" }
}

#[cfg(test)]
impl Session {
    fn system(&self) -> &HeadArraySystem {
        &self.system
    }

    fn board(&self) -> &SimBoard {
        &self.board
    }
}

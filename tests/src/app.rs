//! # Test Application
//!
//! Minimal block executor that runs a raw transaction the way a node does:
//!
//! 1. Decode the bytes into a `StdTx`
//! 2. Run the ante chain against a cache over the committed ledger
//! 3. Route every message to the asset handler, against a second cache
//!    layered over the first
//! 4. Commit both caches on success; on a message failure commit only the
//!    ante cache, so the fee and the sequence bump stay charged
//!
//! Account records (sequences, public keys, names) live in the same store
//! through a [`StoreAccountKeeper`], so every branch sees and discards them
//! together with the ledger writes. Check and simulate runs never commit.

use qc_04_asset_ledger::{
    AccountEnsurer, AssetError, AssetHandler, AssetKeeper, AssetMsg, AuthLookup, CacheStore,
    CoinOptions, Event, KvStore, LedgerConfig, MemoryStore, ROUTER_KEY,
};
use qc_10_ante_handler::{
    AccountKeeper, AnteApi, AnteConfig, AnteContext, AnteError, AnteHandler, ExecMode,
    LedgerFeeKeeper, Msg, NoopPlugin, Secp256k1Signer, Secp256k1Verifier, StdFee, StdSignature,
    StdTx, StoreAccountKeeper,
};
use quantum_telemetry::{init_telemetry, TelemetryConfig};
use shared_types::{AccountId, Address, BlockContext, Coin, Coins, Name};
use std::sync::{Arc, Once};
use tracing::{debug, warn};

/// Native coin, created at genesis by `kratos`.
pub const CORE_DENOM: &str = "kratos/kts";
pub const CORE_MAX_SUPPLY: u128 = 1_000_000_000_000;

pub type Committed = Arc<MemoryStore>;
pub type Accounts = Arc<StoreAccountKeeper<Committed>>;
type AnteStore = Arc<CacheStore<Committed>>;
type MsgStore = Arc<CacheStore<AnteStore>>;

static TELEMETRY: Once = Once::new();

/// Logging and metrics for the test process, installed once.
pub fn init_test_telemetry() {
    TELEMETRY.call_once(|| {
        let config = TelemetryConfig {
            log_level: "warn".to_string(),
            ..TelemetryConfig::for_subsystem("10", "ante")
        };
        // a subscriber installed by the harness wins
        if let Err(err) = init_telemetry(&config) {
            debug!(module = "app", error = %err, "telemetry already installed");
        }
    });
}

/// Deterministic key for tests.
pub fn signer(seed: u8) -> Secp256k1Signer {
    Secp256k1Signer::from_bytes(&[seed; 32]).expect("non-zero seed")
}

pub fn name(s: &str) -> Name {
    Name::new(s).expect("valid name")
}

pub fn core_coins(amount: u128) -> Coins {
    Coins::from_coin(Coin::new(CORE_DENOM, amount))
}

/// Fee in the core coin.
pub fn core_fee(amount: u128, gas: u64) -> StdFee {
    StdFee::new(core_coins(amount), gas)
}

/// Envelope carrying `msg` for the asset router, authorized by `auth`.
pub fn asset_msg(msg: &AssetMsg, auth: &[Address]) -> Result<Msg, AnteError> {
    let mut envelope = Msg::new(ROUTER_KEY, msg.action()).with_data(msg.encode()?);
    if let AssetMsg::Transfer { from, to, amount } = msg {
        envelope = envelope.with_transfer(*from, *to, amount.clone());
    }
    for addr in auth {
        envelope = envelope.with_auth(*addr);
    }
    Ok(envelope)
}

pub struct TestApp {
    pub config: AnteConfig,
    pub ledger_config: LedgerConfig,
    pub accounts: Accounts,
    store: Committed,
    core: Secp256k1Signer,
    height: i64,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Genesis: `kratos` and the fee collector registered, the core coin
    /// created with no supply. The first block is height 1.
    pub fn new() -> Self {
        init_test_telemetry();
        let store: Committed = Arc::new(MemoryStore::new());
        let app = Self {
            config: AnteConfig::default(),
            ledger_config: LedgerConfig::default(),
            accounts: Arc::new(StoreAccountKeeper::with_store(store.clone())),
            store,
            core: signer(0x4b),
            height: 0,
        };
        app.accounts
            .add_name_account(name("kratos"), app.core.address())
            .expect("register kratos");
        app.accounts
            .add_name_account(name("fee@kts"), signer(0xfe).address())
            .expect("register fee collector");
        app.keeper()
            .create(
                &app.block(),
                &name("kratos"),
                &name("kts"),
                Coin::new(CORE_DENOM, CORE_MAX_SUPPLY),
                &CoinOptions::unrestricted(CORE_DENOM),
                b"core coin",
            )
            .expect("create core coin");
        Self { height: 1, ..app }
    }

    pub fn height(&self) -> i64 {
        self.height
    }

    pub fn next_block(&mut self) {
        self.height += 1;
    }

    pub fn set_height(&mut self, height: i64) {
        self.height = height;
    }

    pub fn block(&self) -> BlockContext {
        BlockContext::new(self.config.chain_id.clone(), self.height)
    }

    /// Signing key of `kratos`.
    pub fn core(&self) -> &Secp256k1Signer {
        &self.core
    }

    /// Keeper over the committed store, for queries and seeding.
    pub fn keeper(&self) -> AssetKeeper<Committed, Accounts> {
        AssetKeeper::new(self.store.clone(), self.accounts.clone(), self.ledger_config.clone())
    }

    /// Issue `amount` of the core coin and hand it to `to`.
    pub fn fund(&self, to: &AccountId, amount: u128) -> Result<(), AssetError> {
        let keeper = self.keeper();
        let block = self.block();
        keeper.issue(&block, &name("kratos"), &name("kts"), Coin::new(CORE_DENOM, amount))?;
        keeper.transfer(&block, &AccountId::from(name("kratos")), to, &core_coins(amount))
    }

    /// Sign `msgs` with every key, in order, over the current sequences.
    pub fn sign(
        &self,
        msgs: Vec<Msg>,
        fee: StdFee,
        signers: &[&Secp256k1Signer],
    ) -> Result<StdTx, AnteError> {
        let mut tx = StdTx::new(msgs, fee, Vec::new(), "");
        let block = self.block();
        let mut sigs = Vec::with_capacity(signers.len());
        for key in signers {
            let (sequence, number) = self.accounts.get_auth_sequence(&block, &key.address())?;
            let bytes = tx.sign_bytes(&self.config.chain_id, number, sequence)?;
            sigs.push(StdSignature::new(Some(key.pub_key()), key.sign(&bytes)?));
        }
        tx.signatures = sigs;
        Ok(tx)
    }

    /// Sign and encode.
    pub fn sign_raw(
        &self,
        msgs: Vec<Msg>,
        fee: StdFee,
        signers: &[&Secp256k1Signer],
    ) -> Result<Vec<u8>, AnteError> {
        self.sign(msgs, fee, signers)?.encode()
    }

    /// Mempool admission. Ledger and account writes are discarded; gas used
    /// is returned.
    pub fn check_tx(&self, raw: &[u8]) -> Result<u64, AnteError> {
        let (_, ctx, _) = self.run_ante(raw, ExecMode::Check, false)?;
        Ok(ctx.gas_meter().consumed())
    }

    /// Gas estimate for an unsigned or partially signed transaction.
    pub fn simulate(&self, raw: &[u8]) -> Result<u64, AnteError> {
        let (_, ctx, _) = self.run_ante(raw, ExecMode::Check, true)?;
        Ok(ctx.gas_meter().consumed())
    }

    /// Execute a transaction in the current block.
    pub fn deliver_tx(&self, raw: &[u8]) -> Result<Vec<Event>, AnteError> {
        let (tx, ctx, ante_store) = self.run_ante(raw, ExecMode::Deliver, false)?;

        let msg_store: MsgStore = Arc::new(CacheStore::new(ante_store.clone()));
        let msg_accounts = Arc::new(StoreAccountKeeper::with_store(msg_store.clone()));
        let handler = AssetHandler::new(
            AssetKeeper::new(msg_store.clone(), msg_accounts.clone(), self.ledger_config.clone()),
            msg_accounts,
        );

        match run_msgs(&handler, &ctx.block, &tx) {
            Ok(events) => {
                msg_store.write();
                ante_store.write();
                debug!(module = "app", height = self.height, events = events.len(), "tx delivered");
                Ok(events)
            }
            Err(err) => {
                ante_store.write();
                warn!(module = "app", height = self.height, error = %err, "tx messages failed");
                Err(err)
            }
        }
    }

    fn run_ante(
        &self,
        raw: &[u8],
        mode: ExecMode,
        simulate: bool,
    ) -> Result<(StdTx, AnteContext, AnteStore), AnteError> {
        let tx = StdTx::decode(raw)?;
        let mut ctx = AnteContext::new(self.block(), mode, raw.to_vec());
        let store = Arc::new(CacheStore::new(self.store.clone()));
        self.ante_handler(store.clone()).ante(&mut ctx, &tx, simulate)?;
        Ok((tx, ctx, store))
    }

    fn ante_handler(&self, store: AnteStore) -> AnteHandler {
        let accounts = Arc::new(StoreAccountKeeper::with_store(store.clone()));
        let fees = LedgerFeeKeeper::new(AssetKeeper::new(
            store,
            accounts.clone(),
            self.ledger_config.clone(),
        ));
        AnteHandler::new(
            self.config.clone(),
            accounts,
            fees,
            Arc::new(Secp256k1Verifier::new()),
            NoopPlugin,
        )
    }
}

fn run_msgs<S: KvStore, A: AccountEnsurer, L: AuthLookup>(
    handler: &AssetHandler<S, A, L>,
    block: &BlockContext,
    tx: &StdTx,
) -> Result<Vec<Event>, AnteError> {
    let signers = tx.signers();
    let mut events = Vec::new();
    for (i, msg) in tx.msgs.iter().enumerate() {
        if msg.router != ROUTER_KEY {
            return Err(AnteError::UnknownRequest(format!(
                "unrecognized msg router: {}",
                msg.router
            )));
        }

        let asset = decode_msg(msg)?;
        if asset.action() != msg.msg_type() {
            return Err(AnteError::InvalidRequest(format!(
                "msg {} action {} does not match payload {}",
                i,
                msg.msg_type(),
                asset.action()
            )));
        }
        if let AssetMsg::Transfer { from, to, amount } = &asset {
            msg.validate_transfer_to(from, to, amount)?;
        }

        let emitted = handler
            .handle(block, &signers, &asset)
            .map_err(|e| AnteError::from(e).wrap(format!("msg {}", i)))?;
        events.extend(emitted);
    }
    Ok(events)
}

/// A message without data is a plain transfer described by its envelope.
fn decode_msg(msg: &Msg) -> Result<AssetMsg, AnteError> {
    if msg.data.is_empty() {
        return Ok(AssetMsg::Transfer {
            from: msg.from,
            to: msg.to,
            amount: msg.amount.clone(),
        });
    }
    AssetMsg::decode(&msg.data).map_err(|e| AnteError::TxDecode(format!("asset msg: {}", e)))
}

use super::{AnteDecorator, Flow};
use crate::domain::context::AnteContext;
use crate::domain::errors::AnteError;
use crate::domain::tx::Tx;
use crate::ports::outbound::PluginHook;
use tracing::trace;

/// Hands delivered (or simulated) transactions to the plugin hook.
///
/// Never rejects: the hook cannot influence admission.
pub struct PluginDecorator<P: PluginHook> {
    plugin: P,
}

impl<P: PluginHook> PluginDecorator<P> {
    pub fn new(plugin: P) -> Self {
        Self { plugin }
    }
}

impl<P: PluginHook> AnteDecorator for PluginDecorator<P> {
    fn name(&self) -> &'static str {
        "plugin"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext,
        tx: &dyn Tx,
        simulate: bool,
    ) -> Result<Flow, AnteError> {
        trace!(module = "ante", "plugin ante handler");
        if ctx.is_check_tx() && !simulate {
            return Ok(Flow::Continue);
        }
        self.plugin.handle_tx(&ctx.block, tx);
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorators::test_support::*;
    use crate::domain::context::ExecMode;
    use shared_types::BlockContext;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counting(AtomicUsize);

    impl PluginHook for Arc<Counting> {
        fn handle_tx(&self, _ctx: &BlockContext, tx: &dyn Tx) {
            self.0.fetch_add(tx.msgs().len(), Ordering::SeqCst);
        }
    }

    #[test]
    fn test_plugin_runs_on_deliver_and_simulate_only() {
        let hook = Arc::new(Counting::default());
        let stage = PluginDecorator::new(hook.clone());
        let s = signer(1);
        let tx = unsigned_tx(&[&s], fee(1, 1));

        stage.ante_handle(&mut ctx(ExecMode::Check, 5), &tx, false).unwrap();
        stage.ante_handle(&mut ctx(ExecMode::ReCheck, 5), &tx, false).unwrap();
        assert_eq!(hook.0.load(Ordering::SeqCst), 0);

        stage.ante_handle(&mut ctx(ExecMode::Deliver, 5), &tx, false).unwrap();
        stage.ante_handle(&mut ctx(ExecMode::Check, 5), &tx, true).unwrap();
        assert_eq!(hook.0.load(Ordering::SeqCst), 2);
    }
}

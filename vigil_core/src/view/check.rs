// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change-detection traversal.
//!
//! A pass walks views depth-first in declaration order. Reaching a view it
//! applies, in order:
//!
//! 1. A detached view is skipped with its whole subtree.
//! 2. The view is refreshed if the pass is forced, the view is `Default`,
//!    it is in creation mode, or it is marked `NEEDS_CHECK` or
//!    `DIRTY_DESCENDANT`. Otherwise the branch stops.
//!
//! Refreshing runs the hooks, the template, and then the children with the
//! same rules. The starting view of `detect_changes` and
//! `check_no_changes` is refreshed even when detached.
//!
//! Verification passes follow exactly the same rules but run templates in
//! compare-only mode, skip hooks and views still in creation mode, and leave
//! all flags untouched.

use alloc::boxed::Box;
use core::any::Any;

use crate::component::{Component, ViewLogic};
use crate::context::CheckContext;
use crate::detector::ChangeDetectorRef;
use crate::error::CheckError;
use crate::trace::{
    PassBeginEvent, PassEndEvent, PassKind, PassSummaryBuilder, SkipReason, ViewCheckEvent,
    ViewSkipEvent,
};

use super::flags::{CheckStrategy, NodeKind, ViewFlags};
use super::id::ViewId;
use super::store::ViewTree;

#[derive(Clone, Copy, Debug)]
struct Pass {
    force: bool,
    verify: bool,
}

impl ViewTree {
    /// Runs an unforced pass from `root`, as a scheduled frame does.
    ///
    /// In development mode an outermost tick is followed by a verification
    /// pass with the same rules.
    pub fn tick(&mut self, root: ViewId) -> Result<(), CheckError> {
        self.validate(root);
        let outermost = self.depth == 0;
        self.run_pass(root.idx, PassKind::Tick, false, false)?;
        if outermost && self.config.dev_mode {
            self.run_pass(root.idx, PassKind::Verify, false, false)?;
        }
        Ok(())
    }

    /// Synchronously checks `view` and every attached view under it, whether
    /// or not they are marked.
    ///
    /// `view` itself is checked even when detached. Called from inside the
    /// check of `view` itself (for example from one of its hooks) the
    /// request is deferred: the running check is upgraded to forced, or, if
    /// its template already ran, the template and children run once more.
    pub fn detect_changes(&mut self, view: ViewId) -> Result<(), CheckError> {
        self.validate(view);
        let outermost = self.depth == 0;
        self.run_pass(view.idx, PassKind::DetectChanges, true, true)?;
        if outermost && self.config.dev_mode {
            self.run_pass(view.idx, PassKind::Verify, true, true)?;
        }
        Ok(())
    }

    /// Re-evaluates every binding of `view` and its attached descendants
    /// without committing anything or running hooks, failing with
    /// [`CheckError::ExpressionChanged`] at the first binding whose value
    /// differs from the committed one.
    pub fn check_no_changes(&mut self, view: ViewId) -> Result<(), CheckError> {
        self.validate(view);
        self.run_pass(view.idx, PassKind::Verify, true, true)
    }

    fn run_pass(
        &mut self,
        idx: u32,
        kind: PassKind,
        force: bool,
        explicit: bool,
    ) -> Result<(), CheckError> {
        let pass_index = self.pass_counter;
        self.pass_counter += 1;
        let depth = self.depth;
        self.tracer().pass_begin(&PassBeginEvent {
            pass_index,
            kind,
            root: idx,
            depth,
        });
        tracing::debug!(pass = pass_index, kind = kind.name(), root = idx, depth, "pass begin");

        let pass = Pass {
            force,
            verify: kind == PassKind::Verify,
        };
        let mut stats = PassSummaryBuilder::new(pass_index, kind, idx);
        self.depth += 1;
        let result = if explicit {
            self.refresh_view(idx, pass, &mut stats)
        } else {
            self.check_view(idx, pass, &mut stats)
        };
        self.depth -= 1;

        let ok = result.is_ok();
        let summary = stats.finish(ok);
        let mut tracer = self.tracer();
        tracer.pass_summary(&summary);
        tracer.pass_end(&PassEndEvent {
            pass_index,
            kind,
            ok,
        });
        match &result {
            Ok(()) => tracing::debug!(
                pass = pass_index,
                checked = summary.checked,
                commits = summary.commits,
                "pass end"
            ),
            Err(err) => tracing::warn!(pass = pass_index, %err, "pass aborted"),
        }
        result
    }

    /// Applies the attachment and eligibility rules, then refreshes.
    fn check_view(
        &mut self,
        idx: u32,
        pass: Pass,
        stats: &mut PassSummaryBuilder,
    ) -> Result<(), CheckError> {
        let i = idx as usize;
        let flags = self.flags[i];
        let reason = if !flags.contains(ViewFlags::ATTACHED) {
            Some(SkipReason::Detached)
        } else if pass.force
            || self.strategy[i] == CheckStrategy::Default
            || flags.intersects(
                ViewFlags::CREATION | ViewFlags::NEEDS_CHECK | ViewFlags::DIRTY_DESCENDANT,
            )
        {
            None
        } else {
            Some(SkipReason::Clean)
        };
        if let Some(reason) = reason {
            stats.view_skipped(reason);
            self.tracer().view_skipped(&ViewSkipEvent {
                pass_index: stats.pass_index(),
                view: idx,
                reason,
            });
            return Ok(());
        }
        self.refresh_view(idx, pass, stats)
    }

    /// Refreshes one view and recurses into its children.
    fn refresh_view(
        &mut self,
        idx: u32,
        pass: Pass,
        stats: &mut PassSummaryBuilder,
    ) -> Result<(), CheckError> {
        let i = idx as usize;
        let flags = self.flags[i];
        if flags.contains(ViewFlags::CHECKING) {
            if !pass.verify {
                self.flags[i].insert(ViewFlags::RECHECK);
                tracing::trace!(view = idx, "deferring re-entrant check");
            }
            return Ok(());
        }
        let creation = flags.contains(ViewFlags::CREATION);
        if pass.verify && creation {
            return Ok(());
        }

        stats.view_checked();
        self.tracer().view_checked(&ViewCheckEvent {
            pass_index: stats.pass_index(),
            view: idx,
            creation,
            forced: pass.force,
        });

        self.flags[i].insert(ViewFlags::CHECKING);
        let result = self.refresh_phases(idx, pass, creation, stats);
        self.flags[i].remove(ViewFlags::CHECKING | ViewFlags::RECHECK);
        result
    }

    fn refresh_phases(
        &mut self,
        idx: u32,
        pass: Pass,
        creation: bool,
        stats: &mut PassSummaryBuilder,
    ) -> Result<(), CheckError> {
        let i = idx as usize;
        let mut force = pass.force;
        if !pass.verify {
            let hooks = self.run_pre_hooks(idx, creation);
            self.keep_dirty_on_error(idx, hooks)?;
            if self.take_recheck(idx) {
                force = true;
            }
        }

        let template = self.run_template(idx, pass.verify, creation, stats);
        if pass.verify {
            template?;
        } else {
            // Declared nodes survive a failed creation run, so it never repeats.
            self.flags[i].remove(ViewFlags::CREATION);
            self.keep_dirty_on_error(idx, template)?;
            self.flags[i].remove(ViewFlags::NEEDS_CHECK | ViewFlags::DIRTY_DESCENDANT);
            self.with_component(idx, |c| c.after_content_checked());
        }

        self.check_children(idx, Pass { force, ..pass }, stats)?;

        if !pass.verify {
            self.with_component(idx, |c| c.after_view_checked());
            if self.take_recheck(idx) {
                tracing::debug!(view = idx, "re-running view after re-entrant detect_changes");
                let template = self.run_template(idx, false, false, stats);
                self.keep_dirty_on_error(idx, template)?;
                self.flags[i].remove(ViewFlags::NEEDS_CHECK | ViewFlags::DIRTY_DESCENDANT);
                let forced = Pass {
                    force: true,
                    verify: false,
                };
                self.check_children(idx, forced, stats)?;
                if self.take_recheck(idx) {
                    tracing::warn!(view = idx, "dropping nested detect_changes request");
                }
            }
        }
        Ok(())
    }

    fn check_children(
        &mut self,
        idx: u32,
        pass: Pass,
        stats: &mut PassSummaryBuilder,
    ) -> Result<(), CheckError> {
        for (child, generation) in self.child_snapshot(idx) {
            if !self.is_live(child, generation) {
                continue;
            }
            if self.kind[child as usize] == NodeKind::Container {
                for (view, generation) in self.child_snapshot(child) {
                    if self.is_live(view, generation) {
                        self.check_view(view, pass, stats)?;
                    }
                }
            } else {
                self.check_view(child, pass, stats)?;
            }
        }
        Ok(())
    }

    /// A view whose own hooks or template failed stays marked, together
    /// with the path to it, so the next pass retries it.
    fn keep_dirty_on_error(&mut self, idx: u32, result: Result<(), CheckError>) -> Result<(), CheckError> {
        if result.is_err() {
            self.mark_path(idx);
        }
        result
    }

    fn take_recheck(&mut self, idx: u32) -> bool {
        let flags = &mut self.flags[idx as usize];
        let recheck = flags.contains(ViewFlags::RECHECK);
        flags.remove(ViewFlags::RECHECK);
        recheck
    }

    /// Runs `on_init` (creation only) and `do_check` on a component view.
    fn run_pre_hooks(&mut self, idx: u32, creation: bool) -> Result<(), CheckError> {
        let i = idx as usize;
        let mut component = match self.logic[i].take() {
            Some(ViewLogic::Component(component)) => component,
            // Embedded views have no hooks.
            other => {
                self.logic[i] = other;
                return Ok(());
            }
        };
        let id = self.id_at(idx);
        let mut cd = ChangeDetectorRef::new(self, id);
        let mut result = Ok(());
        if creation {
            result = component.on_init(&mut cd);
        }
        if result.is_ok() {
            result = component.do_check(&mut cd);
        }
        self.logic[i] = Some(ViewLogic::Component(component));
        result
    }

    /// Runs a view's template in normal or verification mode.
    fn run_template(
        &mut self,
        idx: u32,
        verify: bool,
        creation: bool,
        stats: &mut PassSummaryBuilder,
    ) -> Result<(), CheckError> {
        let i = idx as usize;
        let pass_index = stats.pass_index();
        match self.logic[i].take() {
            Some(ViewLogic::Component(mut component)) => {
                let mut cx = CheckContext::new(self, idx, verify, creation, pass_index);
                let mut result = component.template(&mut cx);
                if result.is_ok() {
                    result = cx.finish();
                }
                stats.bindings_committed(cx.commits());
                self.logic[i] = Some(ViewLogic::Component(component));
                result
            }
            Some(ViewLogic::Embedded(mut template)) => {
                let host = self.host[i] as usize;
                let result = match self.logic[host].take() {
                    Some(ViewLogic::Component(mut state)) => {
                        let mut cx = CheckContext::new(self, idx, verify, creation, pass_index);
                        let any: &mut dyn Any = &mut *state;
                        let mut result = template(any, &mut cx);
                        if result.is_ok() {
                            result = cx.finish();
                        }
                        stats.bindings_committed(cx.commits());
                        self.logic[host] = Some(ViewLogic::Component(state));
                        result
                    }
                    other => {
                        self.logic[host] = other;
                        Err(CheckError::InvalidInvocation {
                            view: self.id_at(idx),
                            reason: "host component state is in use",
                        })
                    }
                };
                self.logic[i] = Some(ViewLogic::Embedded(template));
                result
            }
            None => Err(CheckError::InvalidInvocation {
                view: self.id_at(idx),
                reason: "check function is already running",
            }),
        }
    }

    /// Calls `f` on the component of `idx`, if it has one and it is not in
    /// use.
    fn with_component(&mut self, idx: u32, f: impl FnOnce(&mut Box<dyn Component>)) {
        if let Some(ViewLogic::Component(component)) = &mut self.logic[idx as usize] {
            f(component);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use crate::component::Component;
    use crate::config::TreeConfig;
    use crate::context::CheckContext;
    use crate::detector::ChangeDetectorRef;
    use crate::error::CheckError;
    use crate::render::MemoryRenderer;
    use crate::scheduler::ManualFrames;
    use crate::view::{CheckStrategy, ViewFlags, ViewTree};

    type Log = Rc<RefCell<Vec<&'static str>>>;

    struct Hooked {
        name: &'static str,
        log: Log,
        child: Option<&'static str>,
    }

    impl Component for Hooked {
        fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
            self.log.borrow_mut().push(self.name);
            if cx.creation_mode()
                && let Some(name) = self.child
            {
                cx.component(
                    0,
                    Self {
                        name,
                        log: Rc::clone(&self.log),
                        child: None,
                    },
                )?;
            }
            Ok(())
        }

        fn on_init(&mut self, _cd: &mut ChangeDetectorRef<'_>) -> Result<(), CheckError> {
            self.log.borrow_mut().push("init");
            Ok(())
        }

        fn do_check(&mut self, _cd: &mut ChangeDetectorRef<'_>) -> Result<(), CheckError> {
            self.log.borrow_mut().push("do_check");
            Ok(())
        }

        fn after_content_checked(&mut self) {
            self.log.borrow_mut().push("content");
        }

        fn after_view_checked(&mut self) {
            self.log.borrow_mut().push("view");
        }
    }

    fn tree() -> ViewTree {
        ViewTree::with_config(
            TreeConfig::production(),
            MemoryRenderer::new(),
            ManualFrames::new().port(),
        )
    }

    #[test]
    fn hooks_run_in_order_around_children() {
        let log = Log::default();
        let mut tree = tree();
        let root = tree.create_root(Hooked {
            name: "parent",
            log: Rc::clone(&log),
            child: Some("child"),
        });
        tree.tick(root).expect("tick");
        assert_eq!(
            *log.borrow(),
            [
                "init", "do_check", "parent", "content", "init", "do_check", "child", "content",
                "view", "view"
            ]
        );
        log.borrow_mut().clear();
        tree.tick(root).expect("tick");
        assert_eq!(
            *log.borrow(),
            ["do_check", "parent", "content", "do_check", "child", "content", "view", "view"]
        );
    }

    #[test]
    fn refresh_clears_marks() {
        let mut tree = tree();
        let root = tree.create_root(Hooked {
            name: "root",
            log: Log::default(),
            child: Some("child"),
        });
        tree.tick(root).expect("tick");
        let child = tree.children(root).next();
        let Some(crate::view::Child::View(child)) = child else {
            panic!("child view declared");
        };
        tree.mark_for_check(child);
        assert!(tree.flags(root).contains(ViewFlags::DIRTY_DESCENDANT), "ancestor marked");
        tree.tick(root).expect("tick");
        assert!(
            !tree
                .flags(root)
                .intersects(ViewFlags::DIRTY_DESCENDANT | ViewFlags::NEEDS_CHECK),
            "root clean"
        );
        assert!(!tree.flags(child).contains(ViewFlags::NEEDS_CHECK), "child clean");
    }

    struct Push(u32);

    impl Component for Push {
        fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
            if cx.creation_mode() {
                cx.text(0)?;
            }
            cx.text_binding(0, self.0)
        }

        fn strategy(&self) -> CheckStrategy {
            CheckStrategy::OnPush
        }
    }

    #[test]
    fn clean_on_push_root_is_skipped_by_tick() {
        let mut tree = tree();
        let root = tree.create_root(Push(1));
        tree.tick(root).expect("first tick");
        tree.component_mut::<Push>(root).expect("state").0 = 2;
        tree.tick(root).expect("second tick");
        let text = |tree: &ViewTree| {
            tree.renderer::<MemoryRenderer>()
                .expect("memory renderer")
                .rendered_text(tree, root)
        };
        assert_eq!(text(&tree), "1");
        tree.detect_changes(root).expect("forced");
        assert_eq!(text(&tree), "2");
    }

    #[test]
    fn detached_root_is_still_checked_explicitly() {
        let mut tree = tree();
        let root = tree.create_root(Push(1));
        tree.detach(root);
        tree.tick(root).expect("tick");
        assert!(tree.flags(root).contains(ViewFlags::CREATION), "tick skipped it");
        tree.detect_changes(root).expect("explicit");
        assert!(!tree.flags(root).contains(ViewFlags::CREATION), "checked");
    }
}

//! Ticket set builder — orchestrates serial allocation and field assignment

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tf_core::{EngineConfig, PrizeList, Strategy, Ticket, TicketError, TicketSet};

use crate::error::{EngineError, EngineResult};
use crate::fields::FieldAssignmentEngine;
use crate::serial::SerialNumberAllocator;
use crate::RetryLimits;

/// Upper bound on tickets reserved up front; larger batches grow as they go
const MAX_RESERVE: u64 = 1 << 20;

/// Builds complete ticket sets from a prize list.
///
/// Every build gets its own [`SerialNumberAllocator`], so one builder can
/// produce several independent batches.
pub struct TicketSetBuilder<R: Rng = StdRng> {
    config: EngineConfig,
    limits: RetryLimits,
    rng: R,
}

impl TicketSetBuilder<StdRng> {
    /// Builder drawing from an OS-seeded cryptographically secure generator
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Builder with a fixed seed for reproducible batches
    pub fn seeded(config: EngineConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TicketSetBuilder<R> {
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        Self {
            config,
            limits: RetryLimits::default(),
            rng,
        }
    }

    /// Override retry limits
    pub fn with_limits(mut self, limits: RetryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn limits(&self) -> RetryLimits {
        self.limits
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // MULTI-FIELD TICKETS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Build a multi-field ticket set.
    ///
    /// Every prize instance gets one winning ticket; non-winning tickets fill
    /// the batch up to `ticket_count`. If prizes outnumber `ticket_count`, the
    /// target is raised to the number of prize instances.
    pub fn build_multi(&mut self, prizes: &PrizeList, ticket_count: u64) -> EngineResult<TicketSet> {
        if prizes.is_empty() {
            return Err(TicketError::EmptyPrizeList.into());
        }
        if ticket_count == 0 {
            return Err(EngineError::ZeroTicketCount);
        }
        self.config.validate()?;

        if self.config.needs_clamp() {
            log::warn!(
                "{} equal fields are required to win, but only {} are defined; using {}",
                self.config.fields_to_win,
                self.config.field_count,
                self.config.field_count
            );
        }
        let config = self.config.clamped();

        let engine = FieldAssignmentEngine::new(&config, self.limits.max_field_rejections);
        let pool = prizes.pool();
        let instances = prizes.total_instances();
        let target = if instances > ticket_count {
            log::warn!(
                "There are more prizes ({}) than tickets ({}); generating {} tickets",
                instances,
                ticket_count,
                instances
            );
            instances
        } else {
            ticket_count
        };

        for prize in prizes {
            engine.check_feasible(Some(prize.name.as_str()), &pool)?;
        }
        if target > instances {
            engine.check_feasible(None, &pool)?;
        }

        let mut allocator = SerialNumberAllocator::new(&config, self.limits.max_serial_attempts);

        let mut tickets = Vec::with_capacity(target.min(MAX_RESERVE) as usize);

        log::info!("Generating {} winning tickets", instances);
        for prize in prizes {
            for _ in 0..prize.count {
                let serial = allocator.allocate(&mut self.rng)?;
                let fields = engine.assign(Some(prize.name.as_str()), &pool, &mut self.rng)?;
                log::debug!("{} wins {:?}", serial, prize.name);
                tickets.push(Ticket::new(serial, Some(prize.name.clone()), fields));
            }
        }

        log::info!(
            "Generating {} non-winning tickets",
            target.saturating_sub(tickets.len() as u64)
        );
        while (tickets.len() as u64) < target {
            let serial = allocator.allocate(&mut self.rng)?;
            let fields = engine.assign(None, &pool, &mut self.rng)?;
            log::debug!("{} does not win", serial);
            tickets.push(Ticket::new(serial, None, fields));
        }

        log::info!("Sorting {} tickets by serial number", tickets.len());
        Ok(TicketSet::new(
            Strategy::Multi,
            Some(engine.fields_to_win()),
            tickets,
        ))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SINGLE-FIELD TICKETS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Build a single-field ticket set: one ticket per prize instance whose
    /// only field names the prize. No non-winning tickets are added.
    pub fn build_single(&mut self, prizes: &PrizeList) -> EngineResult<TicketSet> {
        if prizes.is_empty() {
            return Err(TicketError::EmptyPrizeList.into());
        }
        self.config.validate()?;

        let mut allocator =
            SerialNumberAllocator::new(&self.config, self.limits.max_serial_attempts);
        let mut tickets = Vec::new();

        log::info!("Generating {} single-field tickets", prizes.total_instances());
        for prize in prizes {
            for _ in 0..prize.count {
                let serial = allocator.allocate(&mut self.rng)?;
                log::debug!("{} wins {:?}", serial, prize.name);
                tickets.push(Ticket::new(
                    serial,
                    Some(prize.name.clone()),
                    vec![prize.name.clone()],
                ));
            }
        }

        Ok(TicketSet::new(Strategy::Single, None, tickets))
    }
}

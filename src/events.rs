//! Callback surface exposed to the host.
//!
//! Interactions are reported as plain [`DepthEvent`] values. Hosts that
//! prefer callbacks implement [`DepthHandler`] and call
//! [`DepthEvent::dispatch`].

use rust_decimal::Decimal;

use crate::models::Side;

/// An interaction raised by the depth view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthEvent {
    /// A row was clicked.
    PriceClick { price: Decimal },
    /// A row was double-clicked.
    RowDoubleClick {
        price: Decimal,
        size: Decimal,
        side: Side,
    },
    /// The live/paused indicator was toggled. What "live" means is up to the host.
    LiveToggle,
}

impl DepthEvent {
    /// Invokes the matching handler method.
    pub fn dispatch<H: DepthHandler + ?Sized>(self, handler: &mut H) {
        match self {
            DepthEvent::PriceClick { price } => handler.on_price_click(price),
            DepthEvent::RowDoubleClick { price, size, side } => {
                handler.on_row_double_click(price, size, side)
            }
            DepthEvent::LiveToggle => handler.on_live_toggle(),
        }
    }
}

/// Host callbacks. Every method defaults to a no-op.
pub trait DepthHandler {
    fn on_price_click(&mut self, _price: Decimal) {}

    fn on_row_double_click(&mut self, _price: Decimal, _size: Decimal, _side: Side) {}

    fn on_live_toggle(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[derive(Default)]
    struct Recorder {
        clicks: Vec<Decimal>,
        double_clicks: Vec<(Decimal, Decimal, Side)>,
        toggles: usize,
    }

    impl DepthHandler for Recorder {
        fn on_price_click(&mut self, price: Decimal) {
            self.clicks.push(price);
        }

        fn on_row_double_click(&mut self, price: Decimal, size: Decimal, side: Side) {
            self.double_clicks.push((price, size, side));
        }

        fn on_live_toggle(&mut self) {
            self.toggles += 1;
        }
    }

    struct Silent;
    impl DepthHandler for Silent {}

    #[test]
    fn dispatch_routes_each_variant() {
        let mut recorder = Recorder::default();
        DepthEvent::PriceClick { price: dec!(99) }.dispatch(&mut recorder);
        DepthEvent::RowDoubleClick {
            price: dec!(99),
            size: dec!(2),
            side: Side::Bid,
        }
        .dispatch(&mut recorder);
        DepthEvent::LiveToggle.dispatch(&mut recorder);

        assert_eq!(recorder.clicks, vec![dec!(99)]);
        assert_eq!(recorder.double_clicks, vec![(dec!(99), dec!(2), Side::Bid)]);
        assert_eq!(recorder.toggles, 1);
    }

    #[test]
    fn default_handlers_ignore_events() {
        DepthEvent::LiveToggle.dispatch(&mut Silent);
    }
}

use gtk4::gdk;
use tracing::trace;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    AtomEnum, ClientMessageEvent, ConfigureWindowAux, ConnectionExt as _, EventMask, MapState, PropMode, Window,
};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use skybar_core::{ExtendedStrut, PlacementError, Rect, Stacking, WindowManagerHints};

use crate::error::BackendError;

x11rb::atom_manager! {
    HintAtoms: HintAtomsCookie {
        _NET_WM_DESKTOP,
        _NET_WM_WINDOW_TYPE,
        _NET_WM_WINDOW_TYPE_DOCK,
        _NET_WM_STATE,
        _NET_WM_STATE_ABOVE,
        _NET_WM_STATE_BELOW,
        _NET_WM_STRUT,
        _NET_WM_STRUT_PARTIAL,
        _KDE_NET_WM_BLUR_BEHIND_REGION,
    }
}

/// Every desktop, as understood by _NET_WM_DESKTOP
const ALL_DESKTOPS: u32 = 0xFFFF_FFFF;

const NET_WM_STATE_REMOVE: u32 = 0;
const NET_WM_STATE_ADD: u32 = 1;
/// Source indication for pagers and panels
const SOURCE_PAGER: u32 = 2;

fn wm_error(e: impl std::fmt::Display) -> PlacementError {
    PlacementError::WindowManager(e.to_string())
}

/// EWMH hints for the panel window over its own X connection
pub struct X11Hints {
    conn: RustConnection,
    gdk_display: gdk::Display,
    root: Window,
    window: Window,
    atoms: HintAtoms,
}

impl X11Hints {
    /// Connect to the X server and intern the EWMH atoms for `window`, which
    /// GDK owns on `gdk_display`
    pub fn connect(window: Window, gdk_display: gdk::Display) -> Result<Self, BackendError> {
        let (conn, screen_num) = x11rb::connect(None)?;
        let root = conn.setup().roots[screen_num].root;
        let atoms = HintAtoms::new(&conn)?.reply()?;

        Ok(Self {
            conn,
            gdk_display,
            root,
            window,
            atoms,
        })
    }

    fn is_mapped(&self) -> Result<bool, PlacementError> {
        // GDK rewrites the EWMH state on map; its requests must reach the server before ours
        self.gdk_display.flush();

        let attributes = self
            .conn
            .get_window_attributes(self.window)
            .map_err(wm_error)?
            .reply()
            .map_err(wm_error)?;
        Ok(attributes.map_state != MapState::UNMAPPED)
    }

    /// Ask the window manager to add or remove a _NET_WM_STATE atom
    fn send_state(&self, action: u32, state: u32) -> Result<(), PlacementError> {
        self.send_client_message(self.atoms._NET_WM_STATE, [action, state, 0, SOURCE_PAGER, 0])
    }

    fn send_client_message(&self, message_type: u32, data: [u32; 5]) -> Result<(), PlacementError> {
        let event = ClientMessageEvent::new(32, self.window, message_type, data);
        self.conn
            .send_event(
                false,
                self.root,
                EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
                event,
            )
            .map_err(wm_error)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), PlacementError> {
        self.conn.flush().map_err(wm_error)
    }
}

impl WindowManagerHints for X11Hints {
    fn set_on_all_desktops(&mut self) -> Result<(), PlacementError> {
        if !self.is_mapped()? {
            self.conn
                .change_property32(
                    PropMode::REPLACE,
                    self.window,
                    self.atoms._NET_WM_DESKTOP,
                    AtomEnum::CARDINAL,
                    &[ALL_DESKTOPS],
                )
                .map_err(wm_error)?;
        }

        // Ignored until the window is managed, then the only way to move it
        self.send_client_message(self.atoms._NET_WM_DESKTOP, [ALL_DESKTOPS, SOURCE_PAGER, 0, 0, 0])?;
        self.flush()
    }

    fn set_dock_type(&mut self) -> Result<(), PlacementError> {
        self.conn
            .change_property32(
                PropMode::REPLACE,
                self.window,
                self.atoms._NET_WM_WINDOW_TYPE,
                AtomEnum::ATOM,
                &[self.atoms._NET_WM_WINDOW_TYPE_DOCK],
            )
            .map_err(wm_error)?;
        self.flush()
    }

    fn set_stacking(&mut self, stacking: Stacking) -> Result<(), PlacementError> {
        let (wanted, opposite) = match stacking {
            Stacking::Above => (self.atoms._NET_WM_STATE_ABOVE, self.atoms._NET_WM_STATE_BELOW),
            Stacking::Below => (self.atoms._NET_WM_STATE_BELOW, self.atoms._NET_WM_STATE_ABOVE),
        };

        if !self.is_mapped()? {
            // Unmapped windows carry their initial state as a plain property
            self.conn
                .change_property32(
                    PropMode::REPLACE,
                    self.window,
                    self.atoms._NET_WM_STATE,
                    AtomEnum::ATOM,
                    &[wanted],
                )
                .map_err(wm_error)?;
        }
        self.send_state(NET_WM_STATE_REMOVE, opposite)?;
        self.send_state(NET_WM_STATE_ADD, wanted)?;

        trace!("Requested {:?} stacking for window {:#x}", stacking, self.window);
        self.flush()
    }

    fn move_resize(&mut self, rect: Rect) -> Result<(), PlacementError> {
        let aux = ConfigureWindowAux::new()
            .x(rect.x)
            .y(rect.y)
            .width(rect.width.max(1) as u32)
            .height(rect.height.max(1) as u32);
        self.conn.configure_window(self.window, &aux).map_err(wm_error)?;
        self.flush()
    }

    fn set_extended_strut(&mut self, strut: &ExtendedStrut) -> Result<(), PlacementError> {
        self.conn
            .change_property32(
                PropMode::REPLACE,
                self.window,
                self.atoms._NET_WM_STRUT_PARTIAL,
                AtomEnum::CARDINAL,
                &strut.to_cardinals(),
            )
            .map_err(wm_error)?;

        // Older window managers only read _NET_WM_STRUT
        self.conn
            .change_property32(
                PropMode::REPLACE,
                self.window,
                self.atoms._NET_WM_STRUT,
                AtomEnum::CARDINAL,
                &strut.to_legacy_cardinals(),
            )
            .map_err(wm_error)?;
        self.flush()
    }

    fn enable_blur_behind(&mut self, enable: bool) -> Result<(), PlacementError> {
        if enable {
            // An empty region blurs the whole window
            self.conn
                .change_property32(
                    PropMode::REPLACE,
                    self.window,
                    self.atoms._KDE_NET_WM_BLUR_BEHIND_REGION,
                    AtomEnum::CARDINAL,
                    &[],
                )
                .map_err(wm_error)?;
        } else {
            self.conn
                .delete_property(self.window, self.atoms._KDE_NET_WM_BLUR_BEHIND_REGION)
                .map_err(wm_error)?;
        }
        self.flush()
    }
}

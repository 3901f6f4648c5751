#![no_std]
#![no_main]

use bootloader::{BootInfo, entry_point};
use core::panic::PanicInfo;
use vgaterm_kernel::{println, serial_println, vga_buffer};

entry_point!(boot_main);

fn boot_main(_boot_info: &'static BootInfo) -> ! {
    serial_println!("[boot] starting");
    vgaterm_kernel::init();

    if let Err(err) = vga_buffer::write_string(b"Hello, Kernel World!\nIt's a nice day.") {
        serial_println!("[boot] write failed: {}", err);
    }

    vgaterm_kernel::hlt_loop();
}

/// This function is called on panic.
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    serial_println!("[boot] {}", info);
    println!("{}", info);
    vgaterm_kernel::hlt_loop();
}
